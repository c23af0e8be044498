// src/filesystem/mod.rs
pub mod dir;
pub mod launch;
pub mod ops;

pub use dir::DirLister;

use crate::rows::{Row, FOLDER_LABEL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The category filters of the listing view, with the accepted filename
/// suffixes for each. Folders is the odd one out: it accepts directories
/// and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Images,
    Videos,
    Zips,
    Folders,
    Pdfs,
    Docs,
    Sheets,
    Installers,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Images,
        Category::Videos,
        Category::Zips,
        Category::Folders,
        Category::Pdfs,
        Category::Docs,
        Category::Sheets,
        Category::Installers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Videos => "Videos",
            Category::Zips => "Zips",
            Category::Folders => "Folders",
            Category::Pdfs => "PDFs",
            Category::Docs => "Docs",
            Category::Sheets => "Sheets",
            Category::Installers => "Installers",
        }
    }

    pub fn extensions(&self) -> Option<&'static [&'static str]> {
        match self {
            Category::Images => Some(&["png", "jpg", "jpeg", "gif", "avif"]),
            Category::Videos => Some(&["mp4", "avi", "mov", "mkv"]),
            Category::Zips => Some(&["zip", "rar", "7z"]),
            Category::Folders => None,
            Category::Pdfs => Some(&["pdf"]),
            Category::Docs => Some(&["doc", "docx"]),
            Category::Sheets => Some(&["xlsx", "xlsm", "xls", "xltx", "xltm"]),
            Category::Installers => Some(&["exe", "msi"]),
        }
    }

    pub fn accepts(&self, entry: &FileEntry) -> bool {
        match self.extensions() {
            None => entry.is_dir,
            Some(extensions) => {
                !entry.is_dir
                    && entry
                        .extension
                        .as_deref()
                        .map(|e| extensions.contains(&e.to_lowercase().as_str()))
                        .unwrap_or(false)
            }
        }
    }

    pub fn next(&self) -> Category {
        let i = Category::ALL.iter().position(|c| c == self).unwrap_or(0);
        Category::ALL[(i + 1) % Category::ALL.len()]
    }

    pub fn prev(&self) -> Category {
        let i = Category::ALL.iter().position(|c| c == self).unwrap_or(0);
        Category::ALL[(i + Category::ALL.len() - 1) % Category::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<chrono::DateTime<chrono::Utc>>,
    pub is_hidden: bool,
    pub extension: Option<String>,
}

impl FileEntry {
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let metadata = std::fs::metadata(path).ok()?;
        let name = path.file_name()?.to_string_lossy().to_string();
        let is_dir = metadata.is_dir();
        let size = metadata.len();
        let modified = metadata.modified().ok()
            .map(|t| chrono::DateTime::<chrono::Utc>::from(t));
        let is_hidden = name.starts_with('.');
        let extension = path.extension().map(|e| e.to_string_lossy().to_string());

        Some(FileEntry { name, path: path.to_path_buf(), is_dir, size, modified, is_hidden, extension })
    }

    pub fn type_label(&self) -> String {
        if self.is_dir {
            FOLDER_LABEL.to_string()
        } else {
            match self.extension {
                Some(ref extension) => extension.to_uppercase(),
                None => "File".to_string(),
            }
        }
    }

    pub fn to_row(&self) -> Row {
        Row {
            name: self.name.clone(),
            size_bytes: self.size,
            type_label: self.type_label(),
            modified: self.modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn entry(name: &str, is_dir: bool) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: PathBuf::from(name),
            is_dir,
            size: 0,
            modified: None,
            is_hidden: name.starts_with('.'),
            extension: std::path::Path::new(name)
                .extension()
                .map(|e| e.to_string_lossy().to_string()),
        }
    }

    #[test]
    fn test_category_suffix_matching_is_case_insensitive() {
        assert!(Category::Images.accepts(&entry("photo.PNG", false)));
        assert!(Category::Images.accepts(&entry("photo.jpeg", false)));
        assert!(!Category::Images.accepts(&entry("notes.txt", false)));
    }

    #[test]
    fn test_folders_category_accepts_directories_only() {
        assert!(Category::Folders.accepts(&entry("stuff", true)));
        assert!(!Category::Folders.accepts(&entry("stuff.zip", false)));
        assert!(!Category::Images.accepts(&entry("shots.png", true)));
    }

    #[test]
    fn test_category_cycle_wraps() {
        assert_eq!(Category::Images.next(), Category::Videos);
        assert_eq!(Category::Installers.next(), Category::Images);
        assert_eq!(Category::Images.prev(), Category::Installers);
    }

    #[test]
    fn test_file_entry_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"content").unwrap();

        let entry = FileEntry::from_path(&path).unwrap();
        assert_eq!(entry.name, "report.pdf");
        assert!(!entry.is_dir);
        assert_eq!(entry.size, 7);
        assert_eq!(entry.extension.as_deref(), Some("pdf"));
        assert_eq!(entry.type_label(), "PDF");
    }

    #[test]
    fn test_to_row_labels_directories() {
        let dir = tempfile::tempdir().unwrap();
        let entry = FileEntry::from_path(dir.path()).unwrap();
        let row = entry.to_row();
        assert_eq!(row.type_label, "Folder");
        assert_eq!(row.name, entry.name);
    }
}
