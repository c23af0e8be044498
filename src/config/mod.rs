// src/config/mod.rs
use crate::filesystem::Category;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Settings carried across sessions. Loading is lenient: a missing or
/// unreadable file just yields defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub last_dir: Option<PathBuf>,
    pub category: Option<Category>,
    #[serde(default)]
    pub show_hidden: bool,
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = Config::file_path() else {
            return Config::default();
        };
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Config::default(),
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let path = Config::file_path().ok_or_else(|| "no config directory available".to_string())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, content).map_err(|e| e.to_string())
    }

    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("filtui").join("config.json"))
    }
}
