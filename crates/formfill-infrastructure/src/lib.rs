pub mod config_service;
pub mod dto;
pub mod local_session_store;
pub mod object_urls;
pub mod paths;
pub mod storage;
pub mod url_correlator;

pub use crate::config_service::{ConfigError, ConfigService};
pub use crate::local_session_store::LocalSessionStore;
pub use crate::object_urls::MemoryObjectUrls;
pub use crate::paths::FormFillPaths;
pub use crate::storage::{JsonFileStorage, MemoryStorage};
pub use crate::url_correlator::{MemoryAddressBar, UrlSessionCorrelator};
