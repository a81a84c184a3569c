//! Unified path management for formfill configuration and storage files.
//!
//! Paths follow the platform conventions reported by the `dirs` crate (XDG on
//! Linux, `Library/Application Support` on macOS, `AppData` on Windows).

use std::path::PathBuf;

const APP_DIR: &str = "formfill";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
    /// The platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::DataDirNotFound => write!(f, "Cannot find data directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for formfill.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/formfill/            # Config directory
/// └── config.toml                # Storage key, retention cap, URL param, logging
///
/// ~/.local/share/formfill/       # Data directory
/// └── local_storage.json         # File-backed key-value storage
/// ```
pub struct FormFillPaths;

impl FormFillPaths {
    /// Returns the formfill configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the formfill data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DataDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path of the file-backed key-value storage.
    pub fn local_storage_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("local_storage.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_app_dirs() {
        if let (Ok(config_dir), Ok(config_file)) =
            (FormFillPaths::config_dir(), FormFillPaths::config_file())
        {
            assert!(config_dir.ends_with(APP_DIR));
            assert_eq!(config_file.parent(), Some(config_dir.as_path()));
        }
        if let Ok(storage_file) = FormFillPaths::local_storage_file() {
            assert!(storage_file.ends_with("formfill/local_storage.json"));
        }
    }
}
