//! Wiring: config file plus host ports in, ready-to-use services out.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use formfill_core::config::{FormFillConfig, StorageConfig};
use formfill_core::location::AddressBar;
use formfill_core::pdf::{FilledPdfSource, ObjectUrlRegistry};
use formfill_core::session::SessionStore;
use formfill_core::storage::KeyValueStorage;
use formfill_infrastructure::{
    ConfigService, JsonFileStorage, LocalSessionStore, UrlSessionCorrelator,
};

use crate::preview::PdfPreview;
use crate::resume::SessionResumer;

/// Loads config from `path`, or from the default location when `None`.
pub fn load_config(path: Option<&Path>) -> Result<FormFillConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::default_location().context("Failed to resolve config location")?,
    };
    service
        .load()
        .with_context(|| format!("Failed to load config from {}", service.path().display()))
}

/// File-backed storage under the user data dir, for hosts without a browser
/// profile.
pub fn file_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStorage>> {
    let storage = JsonFileStorage::default_location(config)
        .context("Failed to resolve local storage location")?;
    tracing::debug!(path = %storage.path().display(), "Using file-backed storage");
    Ok(Arc::new(storage))
}

/// What the host environment provides.
///
/// `storage` and `address_bar` are `None` outside a browser; persistence and
/// address sync then become no-ops.
#[derive(Clone)]
pub struct HostPorts {
    pub storage: Option<Arc<dyn KeyValueStorage>>,
    pub address_bar: Option<Arc<dyn AddressBar>>,
    pub object_urls: Arc<dyn ObjectUrlRegistry>,
    pub pdf_source: Arc<dyn FilledPdfSource>,
}

/// The services the UI layer talks to.
pub struct FormFillContext {
    pub config: FormFillConfig,
    pub store: Arc<dyn SessionStore>,
    pub resumer: SessionResumer,
    pub preview: PdfPreview,
}

impl FormFillContext {
    pub fn new(config: FormFillConfig, ports: HostPorts) -> Self {
        let store: Arc<dyn SessionStore> = match ports.storage {
            Some(storage) => Arc::new(LocalSessionStore::with_config(storage, &config.storage)),
            None => Arc::new(LocalSessionStore::detached()),
        };
        let correlator = match ports.address_bar {
            Some(address_bar) => UrlSessionCorrelator::with_config(address_bar, &config.url),
            None => UrlSessionCorrelator::detached(),
        };

        tracing::debug!(
            storage_key = %config.storage.storage_key,
            max_sessions = config.storage.max_sessions,
            session_param = %config.url.session_param,
            "Form filler context ready"
        );

        Self {
            resumer: SessionResumer::new(store.clone(), correlator, ports.pdf_source),
            preview: PdfPreview::new(ports.object_urls),
            store,
            config,
        }
    }
}
