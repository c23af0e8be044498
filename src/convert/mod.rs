// src/convert/mod.rs
use std::path::{Path, PathBuf};

/// Formats an image can be re-encoded to, each reachable by one keypress
/// in the convert dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Png,
    Jpeg,
    Webp,
    Bmp,
    Gif,
    Tiff,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 6] = [
        TargetFormat::Png,
        TargetFormat::Jpeg,
        TargetFormat::Webp,
        TargetFormat::Bmp,
        TargetFormat::Gif,
        TargetFormat::Tiff,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TargetFormat::Png => "PNG",
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Webp => "WebP",
            TargetFormat::Bmp => "BMP",
            TargetFormat::Gif => "GIF",
            TargetFormat::Tiff => "TIFF",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Webp => "webp",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Gif => "gif",
            TargetFormat::Tiff => "tiff",
        }
    }

    pub fn key(&self) -> char {
        match self {
            TargetFormat::Png => 'p',
            TargetFormat::Jpeg => 'j',
            TargetFormat::Webp => 'w',
            TargetFormat::Bmp => 'b',
            TargetFormat::Gif => 'g',
            TargetFormat::Tiff => 't',
        }
    }

    pub fn from_key(key: char) -> Option<TargetFormat> {
        TargetFormat::ALL.iter().copied().find(|f| f.key() == key)
    }

    fn image_format(&self) -> image::ImageFormat {
        match self {
            TargetFormat::Png => image::ImageFormat::Png,
            TargetFormat::Jpeg => image::ImageFormat::Jpeg,
            TargetFormat::Webp => image::ImageFormat::WebP,
            TargetFormat::Bmp => image::ImageFormat::Bmp,
            TargetFormat::Gif => image::ImageFormat::Gif,
            TargetFormat::Tiff => image::ImageFormat::Tiff,
        }
    }

    fn matches_extension(&self, extension: &str) -> bool {
        match self {
            TargetFormat::Jpeg => matches!(extension, "jpg" | "jpeg"),
            TargetFormat::Tiff => matches!(extension, "tif" | "tiff"),
            _ => extension == self.extension(),
        }
    }
}

/// Re-encodes an image next to its source, swapping only the extension.
/// Refuses to overwrite and to convert a file to its own format. JPEG has
/// no alpha channel, so the pixels are flattened to RGB8 for it.
pub fn convert_image(path: &Path, target: TargetFormat) -> Result<PathBuf, String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if target.matches_extension(&extension) {
        return Err(format!("{} is already {}", path.display(), target.label()));
    }

    let output = path.with_extension(target.extension());
    if output.exists() {
        return Err(format!("{} already exists", output.display()));
    }

    let img = image::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    let img = match target {
        TargetFormat::Jpeg => image::DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };
    img.save_with_format(&output, target.image_format())
        .map_err(|e| format!("Failed to write {}: {}", output.display(), e))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_png(dir: &Path) -> PathBuf {
        let path = dir.join("sample.png");
        image::RgbImage::from_pixel(4, 4, image::Rgb([120, 30, 200]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_convert_png_to_bmp() {
        let dir = tempfile::tempdir().unwrap();
        let src = sample_png(dir.path());

        let out = convert_image(&src, TargetFormat::Bmp).unwrap();
        assert_eq!(out, dir.path().join("sample.bmp"));
        assert!(out.exists());
        assert!(src.exists());
    }

    #[test]
    fn test_convert_flattens_alpha_for_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("alpha.png");
        image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 128]))
            .save(&src)
            .unwrap();

        let out = convert_image(&src, TargetFormat::Jpeg).unwrap();
        assert_eq!(out, dir.path().join("alpha.jpg"));
        assert!(out.exists());
    }

    #[test]
    fn test_convert_refuses_same_format() {
        let dir = tempfile::tempdir().unwrap();
        let src = sample_png(dir.path());
        assert!(convert_image(&src, TargetFormat::Png).is_err());
    }

    #[test]
    fn test_convert_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let src = sample_png(dir.path());
        std::fs::write(dir.path().join("sample.bmp"), b"occupied").unwrap();
        assert!(convert_image(&src, TargetFormat::Bmp).is_err());
    }

    #[test]
    fn test_format_keys_round_trip() {
        for format in TargetFormat::ALL {
            assert_eq!(TargetFormat::from_key(format.key()), Some(format));
        }
        assert_eq!(TargetFormat::from_key('x'), None);
    }
}
