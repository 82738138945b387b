//! Where Jotter keeps its preferences.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Per-user config directory, or the executable's directory when the OS
/// does not provide one.
pub fn config_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "Jotter")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(exe_directory)
}

/// Default preferences file.
pub fn preferences_path() -> PathBuf {
    config_directory().join("preferences.json")
}
