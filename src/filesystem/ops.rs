// src/filesystem/ops.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Removes a file, or an empty directory. Directories are never removed
/// recursively; a non-empty directory is reported as an error.
pub fn delete(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Renames within the parent directory. Files keep their original
/// extension; `new_stem` supplies only the part before it. Directories
/// are renamed verbatim.
pub fn rename(path: &Path, new_stem: &str) -> io::Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no parent directory"))?;

    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(extension) if path.is_file() => format!("{}.{}", new_stem, extension),
        _ => new_stem.to_string(),
    };

    let dest = parent.join(file_name);
    if dest.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", dest.display()),
        ));
    }
    fs::rename(path, &dest)?;
    Ok(dest)
}

/// Moves an entry into `dest_dir`, keeping its name. Falls back to
/// copy+remove when a plain rename fails (cross-device file moves).
pub fn move_to(path: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

    let dest = dest_dir.join(name);
    if dest.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", dest.display()),
        ));
    }

    match fs::rename(path, &dest) {
        Ok(()) => Ok(dest),
        Err(_) if path.is_file() => {
            fs::copy(path, &dest)?;
            fs::remove_file(path)?;
            Ok(dest)
        }
        Err(e) => Err(e),
    }
}
