//! Configuration loading.
//!
//! Reads `config.toml`; every key is optional and a missing file means
//! "all defaults".
//!
//! ```toml
//! [storage]
//! storage_key = "form-filler-sessions"
//! max_sessions = 10
//!
//! [url]
//! session_param = "session"
//!
//! [logging]
//! level = "info"
//! format = "compact"   # pretty | compact | json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use formfill_core::config::FormFillConfig;

use crate::paths::{FormFillPaths, PathError};

/// Errors that can occur while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// Path resolution error.
    PathError(PathError),
    /// Values parsed but make no sense.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigError::PathError(e) => write!(f, "Path error: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::TomlParseError(e)
    }
}

impl From<PathError> for ConfigError {
    fn from(e: PathError) -> Self {
        ConfigError::PathError(e)
    }
}

/// Loads [`FormFillConfig`] from a TOML file.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `FormFillPaths::config_file()`.
    pub fn default_location() -> Result<Self, ConfigError> {
        Ok(Self::with_path(FormFillPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, using defaults for a missing or empty file.
    pub fn load(&self) -> Result<FormFillConfig, ConfigError> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "No config file; using defaults");
            return Ok(FormFillConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: FormFillConfig = if content.trim().is_empty() {
            FormFillConfig::default()
        } else {
            toml::from_str(&content)?
        };

        validate(&config)?;
        tracing::debug!(path = ?self.path, "Loaded config");
        Ok(config)
    }
}

fn validate(config: &FormFillConfig) -> Result<(), ConfigError> {
    if config.storage.storage_key.is_empty() {
        return Err(ConfigError::Invalid("storage.storage_key must not be empty".to_string()));
    }
    if config.storage.max_sessions == 0 {
        return Err(ConfigError::Invalid("storage.max_sessions must be at least 1".to_string()));
    }
    if config.url.session_param.is_empty() {
        return Err(ConfigError::Invalid("url.session_param must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formfill_core::config::LogFormat;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), FormFillConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[storage]\nmax_sessions = 3\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = ConfigService::with_path(&path).load().unwrap();
        assert_eq!(config.storage.max_sessions, 3);
        assert_eq!(config.storage.storage_key, "form-filler-sessions");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.url.session_param, "session");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[storage]\nmax_sessions = 0\n").unwrap();

        let err = ConfigService::with_path(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[storage\n").unwrap();

        let err = ConfigService::with_path(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseError(_)));
    }
}
