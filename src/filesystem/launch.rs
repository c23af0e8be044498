// src/filesystem/launch.rs
use std::path::Path;
use std::process::Command;

/// Opens an entry with the platform's default handler. Directories open
/// in the file manager.
pub fn open_path(path: &Path) -> Result<(), String> {
    #[cfg(target_os = "windows")]
    return spawn(Command::new("explorer").arg(path));

    #[cfg(target_os = "macos")]
    return spawn(Command::new("open").arg(path));

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        which::which("xdg-open").map_err(|_| "xdg-open not found".to_string())?;
        spawn(Command::new("xdg-open").arg(path))
    }
}

/// Reveals an entry in the file manager, selecting it where the platform
/// supports that; otherwise opens the parent directory.
pub fn reveal(path: &Path) -> Result<(), String> {
    #[cfg(target_os = "windows")]
    return spawn(Command::new("explorer").arg("/select,").arg(path));

    #[cfg(target_os = "macos")]
    return spawn(Command::new("open").arg("-R").arg(path));

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        which::which("xdg-open").map_err(|_| "xdg-open not found".to_string())?;
        let parent = path.parent().unwrap_or(Path::new("."));
        spawn(Command::new("xdg-open").arg(parent))
    }
}

fn spawn(command: &mut Command) -> Result<(), String> {
    command.spawn().map(|_| ()).map_err(|e| e.to_string())
}
