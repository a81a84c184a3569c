//! File-backed key-value storage.
//!
//! Keeps every item in one JSON object on disk so a desktop shell or a test
//! harness can survive process restarts the way a browser profile does.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use formfill_core::config::{DEFAULT_QUOTA_BYTES, StorageConfig};
use formfill_core::error::{FormFillError, Result};
use formfill_core::storage::KeyValueStorage;

use crate::paths::{FormFillPaths, PathError};

type Items = BTreeMap<String, String>;

/// Key-value storage persisted to a single JSON file.
///
/// File layout:
/// ```text
/// { "form-filler-sessions": "{\"s1\":{...}}", "other-key": "..." }
/// ```
///
/// Every write holds an exclusive lock on a sibling `.lock` file for the
/// whole read-modify-write and replaces the data file by renaming a synced
/// temp file over it. Like browser storage the file has a byte quota
/// (key plus value lengths). A file that no longer parses makes every call
/// fail until it is removed.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    quota_bytes: usize,
}

impl JsonFileStorage {
    /// Storage at `path` with the default 5 MiB quota.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_quota(path, DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota(path: impl Into<PathBuf>, quota_bytes: usize) -> Self {
        Self {
            path: path.into(),
            quota_bytes,
        }
    }

    /// Uses `config.quota_bytes` as the capacity.
    pub fn with_config(path: impl Into<PathBuf>, config: &StorageConfig) -> Self {
        Self::with_quota(path, config.quota_bytes)
    }

    /// Storage at `FormFillPaths::local_storage_file()`.
    pub fn default_location(config: &StorageConfig) -> std::result::Result<Self, PathError> {
        Ok(Self::with_config(FormFillPaths::local_storage_file()?, config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> Result<Items> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Items::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Items::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Runs `f` on the current items under the lock and writes the result
    /// back only if `f` succeeds.
    fn modify<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Items) -> Result<()>,
    {
        let _lock = self.lock()?;
        let mut items = self.read_items()?;
        f(&mut items)?;
        self.replace(&items)
    }

    /// The lock is released when the returned handle is closed.
    fn lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.path.with_extension("lock"))?;
        file.lock_exclusive().map_err(|e| {
            FormFillError::storage_unavailable(format!(
                "cannot lock {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(file)
    }

    fn replace(&self, items: &Items) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(serde_json::to_string(items)?.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

fn used_bytes(items: &Items) -> usize {
    items.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl KeyValueStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let quota = self.quota_bytes;
        self.modify(|items| {
            items.insert(key.to_string(), value.to_string());
            let needed = used_bytes(items);
            if needed > quota {
                return Err(FormFillError::QuotaExceeded { needed, quota });
            }
            Ok(())
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.modify(|items| {
            items.remove(key);
            Ok(())
        })
    }
}
