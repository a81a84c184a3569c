//! Session DTOs and the codec between them and the domain model.
//!
//! The stored shape is what the browser client has always written to local
//! storage, so key names are camelCase and optional keys are omitted rather
//! than written as `null`:
//!
//! ```text
//! {
//!   "id": "...",
//!   "fields": [ ... ],
//!   "messages": [
//!     { "id", "role", "content", "timestamp": "2024-05-01T12:00:00.123Z",
//!       "status"?, "agentLog"?: [ { "id", "type", "timestamp", "content",
//!                                   "details"?, "toolName"?, "toolInput"? } ] }
//!   ],
//!   "userSessionId"?: "..."
//! }
//! ```
//!
//! PDF bytes, tool calls and the processing flag are not stored.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use formfill_core::error::{FormFillError, Result};
use formfill_core::session::{
    AgentLogEntry, ChatMessage, FormField, LoadedSession, MessageRole, Session,
};

// ============================================================================
// Timestamps
// ============================================================================

/// Encodes an instant as RFC 3339 in UTC with a `Z` suffix.
///
/// As many fractional digits as the instant needs are written (none, 3, 6
/// or 9), so decoding gives back the identical instant.
pub fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses an RFC 3339 timestamp with any offset into UTC.
///
/// Accepts what `Date.prototype.toISOString` produces
/// (`2024-05-01T12:00:00.123Z`).
pub fn decode_timestamp(text: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}

// ============================================================================
// Agent log entries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAgentLogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<Map<String, Value>>,
}

impl From<&AgentLogEntry> for StoredAgentLogEntry {
    fn from(entry: &AgentLogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            kind: entry.kind.as_str().to_string(),
            timestamp: encode_timestamp(&entry.timestamp),
            content: entry.content.clone(),
            details: entry.details.clone(),
            tool_name: entry.tool_name.clone(),
            tool_input: entry.tool_input.clone(),
        }
    }
}

impl TryFrom<StoredAgentLogEntry> for AgentLogEntry {
    type Error = FormFillError;

    fn try_from(stored: StoredAgentLogEntry) -> Result<Self> {
        Ok(Self {
            timestamp: decode_timestamp(&stored.timestamp)?,
            id: stored.id,
            kind: stored.kind.into(),
            content: stored.content,
            details: stored.details,
            tool_name: stored.tool_name,
            tool_input: stored.tool_input,
        })
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_log: Option<Vec<StoredAgentLogEntry>>,
}

impl From<&ChatMessage> for StoredMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.clone(),
            role: message.role,
            content: message.content.clone(),
            timestamp: encode_timestamp(&message.timestamp),
            status: message.status.as_ref().map(|s| s.as_str().to_string()),
            agent_log: message
                .agent_log
                .as_ref()
                .map(|log| log.iter().map(StoredAgentLogEntry::from).collect()),
        }
    }
}

impl TryFrom<StoredMessage> for ChatMessage {
    type Error = FormFillError;

    fn try_from(stored: StoredMessage) -> Result<Self> {
        let agent_log = stored
            .agent_log
            .map(|log| {
                log.into_iter()
                    .map(AgentLogEntry::try_from)
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(Self {
            timestamp: decode_timestamp(&stored.timestamp)?,
            id: stored.id,
            role: stored.role,
            content: stored.content,
            status: stored.status.map(Into::into),
            agent_log,
            tool_calls: Vec::new(),
        })
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// The persisted projection of a [`Session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub id: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
    /// Backend correlation id used to re-fetch the filled PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_session_id: Option<String>,
}

impl StoredSession {
    /// Encodes a session for storage. An empty `user_session_id` is treated
    /// as absent.
    pub fn from_domain(session: &Session, user_session_id: Option<&str>) -> Self {
        Self {
            id: session.id().to_string(),
            fields: session.fields.clone(),
            messages: session.messages.iter().map(StoredMessage::from).collect(),
            user_session_id: user_session_id
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        }
    }

    /// Decodes back into the loaded projection.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if any timestamp fails to parse.
    pub fn into_loaded(self) -> Result<LoadedSession> {
        let messages = self
            .messages
            .into_iter()
            .map(ChatMessage::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(LoadedSession {
            id: self.id,
            fields: self.fields,
            messages,
            user_session_id: self.user_session_id,
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
