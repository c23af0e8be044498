// src/filesystem/dir.rs
use super::{Category, FileEntry};
use crate::rows::Row;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory lister feeding the listing view. The entry sequence is
/// rebuilt wholesale on every refresh; nothing here caches across
/// directory or filter changes.
pub struct DirLister {
    pub current_path: PathBuf,
    pub entries: Vec<FileEntry>,
    pub category: Category,
    pub show_hidden: bool,
    pub name_filter: Option<String>,
}

impl DirLister {
    pub fn new(path: PathBuf, category: Category, show_hidden: bool) -> Self {
        let mut lister = DirLister {
            current_path: path,
            entries: Vec::new(),
            category,
            show_hidden,
            name_filter: None,
        };
        lister.refresh();
        lister
    }

    pub fn refresh(&mut self) {
        self.entries.clear();
        let path = &self.current_path;

        for entry in WalkDir::new(path).max_depth(1) {
            if let Ok(entry) = entry {
                let entry_path = entry.path();
                if entry_path == path { continue; }

                if let Some(file_entry) = FileEntry::from_path(entry_path) {
                    if !self.show_hidden && file_entry.is_hidden { continue; }
                    if !self.category.accepts(&file_entry) { continue; }
                    if let Some(ref filter) = self.name_filter {
                        if !file_entry.name.to_lowercase().contains(&filter.to_lowercase()) {
                            continue;
                        }
                    }
                    self.entries.push(file_entry);
                }
            }
        }

        self.entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }

    pub fn rows(&self) -> Vec<Row> {
        self.entries.iter().map(|e| e.to_row()).collect()
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.refresh();
    }

    pub fn set_name_filter(&mut self, query: Option<String>) {
        self.name_filter = query.filter(|q| !q.is_empty());
        self.refresh();
    }

    pub fn navigate_to(&mut self, path: &Path) {
        if path.is_dir() {
            self.current_path = path.to_path_buf();
            self.refresh();
        }
    }

    pub fn navigate_up(&mut self) {
        if let Some(parent) = self.current_path.parent() {
            self.current_path = parent.to_path_buf();
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("photo.png"), b"png").unwrap();
        fs::write(dir.path().join("clip.mp4"), b"mp4").unwrap();
        fs::write(dir.path().join("notes.txt"), b"txt").unwrap();
        fs::write(dir.path().join(".hidden.png"), b"png").unwrap();
        fs::create_dir(dir.path().join("album")).unwrap();
        dir
    }

    #[test]
    fn test_category_filter_limits_listing() {
        let dir = fixture();
        let lister = DirLister::new(dir.path().to_path_buf(), Category::Images, false);
        let names: Vec<&str> = lister.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["photo.png"]);
    }

    #[test]
    fn test_folders_category_lists_directories() {
        let dir = fixture();
        let lister = DirLister::new(dir.path().to_path_buf(), Category::Folders, false);
        let names: Vec<&str> = lister.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["album"]);
    }

    #[test]
    fn test_hidden_files_require_toggle() {
        let dir = fixture();
        let mut lister = DirLister::new(dir.path().to_path_buf(), Category::Images, false);
        assert_eq!(lister.entries.len(), 1);
        lister.show_hidden = true;
        lister.refresh();
        assert_eq!(lister.entries.len(), 2);
        assert_eq!(lister.entries[0].name, ".hidden.png");
    }

    #[test]
    fn test_name_filter_is_case_insensitive_contains() {
        let dir = fixture();
        let mut lister = DirLister::new(dir.path().to_path_buf(), Category::Videos, false);
        lister.set_name_filter(Some("CLIP".to_string()));
        assert_eq!(lister.entries.len(), 1);
        lister.set_name_filter(Some("nope".to_string()));
        assert!(lister.entries.is_empty());
        lister.set_name_filter(None);
        assert_eq!(lister.entries.len(), 1);
    }

    #[test]
    fn test_navigation_relists() {
        let dir = fixture();
        let sub = dir.path().join("album");
        fs::write(sub.join("cover.jpg"), b"jpg").unwrap();

        let mut lister = DirLister::new(dir.path().to_path_buf(), Category::Images, false);
        lister.navigate_to(&sub);
        assert_eq!(lister.current_path, sub);
        assert_eq!(lister.entries.len(), 1);
        assert_eq!(lister.entries[0].name, "cover.jpg");

        lister.navigate_up();
        assert_eq!(lister.current_path, dir.path());
    }
}
