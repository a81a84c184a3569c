//! In-process key-value storage with a byte quota.
//!
//! Behaves like a browser's local storage for one origin: string items, a
//! fixed capacity, and a switch to simulate storage being blocked.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use formfill_core::config::{DEFAULT_QUOTA_BYTES, StorageConfig};
use formfill_core::error::{FormFillError, Result};
use formfill_core::storage::KeyValueStorage;

/// Key-value storage held in memory.
///
/// Capacity is counted as the byte length of every key plus every value.
#[derive(Debug)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    quota_bytes: usize,
    available: AtomicBool,
}

impl MemoryStorage {
    /// Creates an empty storage with the default 5 MiB quota.
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota_bytes,
            available: AtomicBool::new(true),
        }
    }

    /// Uses `config.quota_bytes` as the capacity.
    pub fn with_config(config: &StorageConfig) -> Self {
        Self::with_quota(config.quota_bytes)
    }

    /// Makes every subsequent call fail with `StorageUnavailable` (or
    /// succeed again when `true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Bytes currently used by all items.
    pub fn used_bytes(&self) -> usize {
        self.items
            .read()
            .map(|items| items.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(FormFillError::storage_unavailable("local storage is disabled"))
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.ensure_available()?;
        let items = self
            .items
            .read()
            .map_err(|e| FormFillError::internal(format!("storage lock poisoned: {}", e)))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_available()?;
        let mut items = self
            .items
            .write()
            .map_err(|e| FormFillError::internal(format!("storage lock poisoned: {}", e)))?;

        let others: usize = items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        let needed = others + key.len() + value.len();
        if needed > self.quota_bytes {
            return Err(FormFillError::QuotaExceeded {
                needed,
                quota: self.quota_bytes,
            });
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.ensure_available()?;
        let mut items = self
            .items
            .write()
            .map_err(|e| FormFillError::internal(format!("storage lock poisoned: {}", e)))?;
        items.remove(key);
        Ok(())
    }
}
