use serde::{Deserialize, Serialize};

/// Storage key under which the whole session bucket is kept.
pub const DEFAULT_STORAGE_KEY: &str = "form-filler-sessions";
/// Retention cap for cached sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10;
/// Typical browser local-storage allowance per origin.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;
/// Query parameter that carries the session id.
pub const DEFAULT_SESSION_PARAM: &str = "session";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct FormFillConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub url: UrlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Byte budget for the in-memory storage backend.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            max_sessions: default_max_sessions(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

fn default_quota_bytes() -> usize {
    DEFAULT_QUOTA_BYTES
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UrlConfig {
    #[serde(default = "default_session_param")]
    pub session_param: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            session_param: default_session_param(),
        }
    }
}

fn default_session_param() -> String {
    DEFAULT_SESSION_PARAM.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive such as `info` or `formfill_infrastructure=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormFillConfig::default();
        assert_eq!(config.storage.storage_key, "form-filler-sessions");
        assert_eq!(config.storage.max_sessions, 10);
        assert_eq!(config.url.session_param, "session");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: FormFillConfig =
            serde_json::from_str(r#"{"storage":{"max_sessions":3}}"#).unwrap();
        assert_eq!(config.storage.max_sessions, 3);
        assert_eq!(config.storage.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.logging.level, "info");
    }
}
