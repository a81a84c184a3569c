//! Local-storage-backed SessionStore implementation.
//!
//! All cached sessions live in one JSON object under one storage key:
//!
//! ```text
//! "form-filler-sessions" => { "<session id>": StoredSession, ... }
//! ```
//!
//! This module is the only code that reads or writes that key, so the
//! retention cap is enforced in exactly one place.
//!
//! # Retention
//!
//! After inserting, if the bucket holds more than `max_sessions` entries the
//! first entry in enumeration order is dropped. Overwriting a session keeps
//! its original position, so "first" means "first saved", not "least
//! recently used". The bound is approximate: a backend whose enumeration
//! order differs from insertion order evicts a different entry, and only one
//! entry is dropped per save even if the bucket was already over the cap.
//!
//! # Concurrency
//!
//! `save` is a plain read-modify-write. Two writers racing on the same
//! storage key (for instance two tabs) lose updates; the last writer wins.

use std::sync::Arc;

use serde_json::{Map, Value};

use formfill_core::config::StorageConfig;
use formfill_core::error::{FormFillError, Result};
use formfill_core::session::{LoadedSession, Session, SessionStore};
use formfill_core::storage::KeyValueStorage;

use crate::dto::StoredSession;

/// The decoded contents of the storage key, in enumeration order.
///
/// Entries are kept as raw JSON so one unreadable entry does not affect the
/// others and entries written by a newer client are written back untouched.
#[derive(Debug, Default)]
struct SessionBucket {
    entries: Map<String, Value>,
}

impl SessionBucket {
    /// Parses the stored blob. Anything that is not a JSON object yields an
    /// empty bucket.
    fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(entries)) => Self { entries },
            Ok(other) => {
                tracing::warn!(
                    kind = json_kind(&other),
                    "Session bucket is not an object; treating as empty"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session bucket is corrupt; treating as empty");
                Self::default()
            }
        }
    }

    fn get(&self, session_id: &str) -> Option<&Value> {
        self.entries.get(session_id)
    }

    fn insert(&mut self, session_id: &str, entry: Value) {
        self.entries.insert(session_id.to_string(), entry);
    }

    fn remove(&mut self, session_id: &str) -> bool {
        self.entries.shift_remove(session_id).is_some()
    }

    /// Drops the first entry if the bucket is over `max_sessions`.
    fn evict_overflow(&mut self, max_sessions: usize) -> Option<String> {
        if self.entries.len() <= max_sessions {
            return None;
        }
        let oldest = self.entries.keys().next().cloned()?;
        self.entries.shift_remove(&oldest);
        Some(oldest)
    }

    fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Session store that keeps a bounded bucket of sessions in a key-value
/// storage.
///
/// Built without a storage (see [`LocalSessionStore::detached`]) it behaves
/// as it would outside a browser: saves are skipped and loads find nothing.
#[derive(Clone)]
pub struct LocalSessionStore {
    storage: Option<Arc<dyn KeyValueStorage>>,
    storage_key: String,
    max_sessions: usize,
}

impl LocalSessionStore {
    /// Creates a store with the default key and retention cap.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_config(storage, &StorageConfig::default())
    }

    pub fn with_config(storage: Arc<dyn KeyValueStorage>, config: &StorageConfig) -> Self {
        Self {
            storage: Some(storage),
            storage_key: config.storage_key.clone(),
            max_sessions: config.max_sessions,
        }
    }

    /// A store with no storage behind it.
    pub fn detached() -> Self {
        let config = StorageConfig::default();
        Self {
            storage: None,
            storage_key: config.storage_key,
            max_sessions: config.max_sessions,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Removes the whole bucket.
    pub fn clear(&self) -> Result<()> {
        match &self.storage {
            Some(storage) => storage.remove_item(&self.storage_key),
            None => Ok(()),
        }
    }

    fn storage(&self) -> Result<&Arc<dyn KeyValueStorage>> {
        self.storage
            .as_ref()
            .ok_or_else(|| FormFillError::storage_unavailable("no local storage in this context"))
    }

    /// Reads the bucket. A failed read counts as an empty bucket.
    fn read_bucket(&self, storage: &dyn KeyValueStorage) -> SessionBucket {
        match storage.get_item(&self.storage_key) {
            Ok(raw) => SessionBucket::parse(raw.as_deref()),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.storage_key, "Failed to read session bucket");
                SessionBucket::default()
            }
        }
    }

    fn write_bucket(&self, storage: &dyn KeyValueStorage, bucket: &SessionBucket) -> Result<()> {
        storage.set_item(&self.storage_key, &bucket.to_json()?)
    }
}

impl SessionStore for LocalSessionStore {
    fn try_save(&self, session: &Session, user_session_id: Option<&str>) -> Result<()> {
        let storage = self.storage()?;

        tracing::debug!(
            session_id = %session.id(),
            user_session_id = ?user_session_id,
            fields = session.fields.len(),
            messages = session.messages.len(),
            "Saving session"
        );

        let entry = StoredSession::from_domain(session, user_session_id).to_value()?;

        let mut bucket = self.read_bucket(storage.as_ref());
        bucket.insert(session.id(), entry);
        let evicted = bucket.evict_overflow(self.max_sessions);
        if let Some(evicted) = &evicted {
            tracing::debug!(evicted = %evicted, "Evicted oldest cached session");
        }

        self.write_bucket(storage.as_ref(), &bucket)?;

        tracing::debug!(
            session_id = %session.id(),
            cached = bucket.len(),
            "Session saved"
        );
        Ok(())
    }

    fn try_load(&self, session_id: &str) -> Result<Option<LoadedSession>> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };

        let raw = storage.get_item(&self.storage_key)?;
        let bucket = SessionBucket::parse(raw.as_deref());

        let Some(entry) = bucket.get(session_id) else {
            tracing::debug!(session_id = %session_id, "No cached session");
            return Ok(None);
        };

        let loaded = StoredSession::from_value(entry.clone())?.into_loaded()?;

        tracing::debug!(
            session_id = %loaded.id,
            user_session_id = ?loaded.user_session_id,
            fields = loaded.fields.len(),
            messages = loaded.messages.len(),
            "Loaded cached session"
        );
        Ok(Some(loaded))
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let mut bucket = SessionBucket::parse(storage.get_item(&self.storage_key)?.as_deref());
        if bucket.remove(session_id) {
            self.write_bucket(storage.as_ref(), &bucket)?;
        }
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let Some(storage) = &self.storage else {
            return Ok(Vec::new());
        };
        let raw = storage.get_item(&self.storage_key)?;
        Ok(SessionBucket::parse(raw.as_deref()).ids())
    }

    fn save(&self, session: &Session, user_session_id: Option<&str>) {
        if self.storage.is_none() {
            tracing::debug!(session_id = %session.id(), "No local storage; session not cached");
            return;
        }
        if let Err(e) = self.try_save(session, user_session_id) {
            tracing::warn!(
                session_id = %session.id(),
                error = %e,
                "Failed to save session to local storage"
            );
        }
    }

    fn load(&self, session_id: &str) -> Option<LoadedSession> {
        match self.try_load(session_id) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Error loading session");
                None
            }
        }
    }
}
