//! Session store trait.
//!
//! Defines the interface the UI layer uses to cache sessions locally.

use super::form_field::FormField;
use super::message::ChatMessage;
use super::model::Session;
use crate::error::Result;

/// A session read back from the local cache.
///
/// It carries everything the cache keeps (no PDFs) plus the backend-issued
/// `user_session_id`, which is how the filled PDF is fetched again.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSession {
    pub id: String,
    pub fields: Vec<FormField>,
    pub messages: Vec<ChatMessage>,
    pub user_session_id: Option<String>,
}

impl LoadedSession {
    /// Turns the cached state into a live session with no PDFs attached.
    pub fn into_session(self) -> Session {
        Session::restore(self.id, self.fields, self.messages)
    }
}

/// A best-effort local cache of sessions.
///
/// Implementations must never let a storage failure reach the UI: `save`
/// swallows (and logs) errors and `load` maps every failure to `None`. The
/// `try_*` methods expose the underlying error for diagnostics.
///
/// # Implementation Notes
///
/// Implementations are expected to bound how many sessions they keep and to
/// be the only code that touches their underlying storage key.
pub trait SessionStore: Send + Sync {
    /// Persists the session, tagging it with the backend correlation id.
    fn try_save(&self, session: &Session, user_session_id: Option<&str>) -> Result<()>;

    /// Reads a session back.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(_))`: Session found and decoded
    /// - `Ok(None)`: No such session
    /// - `Err(_)`: Storage or decoding failed
    fn try_load(&self, session_id: &str) -> Result<Option<LoadedSession>>;

    /// Removes a session; succeeds if it did not exist.
    fn delete(&self, session_id: &str) -> Result<()>;

    /// Ids of all cached sessions, in the order eviction would consider them.
    fn list_ids(&self) -> Result<Vec<String>>;

    /// Best-effort save. Failures are logged and dropped.
    fn save(&self, session: &Session, user_session_id: Option<&str>);

    /// Best-effort load. Every failure reads as "no session".
    fn load(&self, session_id: &str) -> Option<LoadedSession>;
}
