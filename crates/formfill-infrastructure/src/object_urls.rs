//! In-memory object URL registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use formfill_core::pdf::ObjectUrlRegistry;

/// Hands out `blob:` URLs for byte buffers and keeps the buffers alive until
/// the URL is revoked.
#[derive(Debug)]
pub struct MemoryObjectUrls {
    origin: String,
    live: RwLock<HashMap<String, Arc<[u8]>>>,
}

impl MemoryObjectUrls {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            live: RwLock::new(HashMap::new()),
        }
    }

    /// Number of URLs created and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.read().map(|live| live.len()).unwrap_or(0)
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live
            .read()
            .map(|live| live.contains_key(url))
            .unwrap_or(false)
    }

    /// The bytes behind a live URL.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.live.read().ok().and_then(|live| live.get(url).cloned())
    }
}

impl Default for MemoryObjectUrls {
    fn default() -> Self {
        Self::new("null")
    }
}

impl ObjectUrlRegistry for MemoryObjectUrls {
    fn create_object_url(&self, bytes: Arc<[u8]>, mime_type: &str) -> String {
        let url = format!("blob:{}/{}", self.origin, Uuid::new_v4());
        tracing::trace!(url = %url, mime_type, len = bytes.len(), "Created object URL");
        if let Ok(mut live) = self.live.write() {
            live.insert(url.clone(), bytes);
        }
        url
    }

    fn revoke_object_url(&self, url: &str) {
        if let Ok(mut live) = self.live.write() {
            if live.remove(url).is_some() {
                tracing::trace!(url = %url, "Revoked object URL");
            }
        }
    }
}
