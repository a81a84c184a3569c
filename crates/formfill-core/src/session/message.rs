//! Chat message types.
//!
//! This module contains the messages exchanged between the user and the
//! form-filling assistant, including roles, delivery status and the tool
//! calls the assistant announced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::agent_log::AgentLogEntry;
use crate::id::new_id;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the assistant.
    Assistant,
    /// Client-generated notice (upload accepted, errors, ...).
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Delivery state of a message.
///
/// Unknown states are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    Sending,
    Streaming,
    Complete,
    Error,
    Other(String),
}

impl MessageStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sending => "sending",
            Self::Streaming => "streaming",
            Self::Complete => "complete",
            Self::Error => "error",
            Self::Other(status) => status,
        }
    }
}

impl From<String> for MessageStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sending" => Self::Sending,
            "streaming" => Self::Streaming,
            "complete" => Self::Complete,
            "error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for MessageStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<MessageStatus> for String {
    fn from(status: MessageStatus) -> Self {
        match status {
            MessageStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

/// A tool invocation announced by the assistant in a `tool_use` event.
///
/// Tool calls only live in memory; they are not part of the stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub input: Map<String, Value>,
    /// Human-readable description supplied by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly: Option<String>,
}

/// A single message in the session's chat.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub status: Option<MessageStatus>,
    /// `None` and `Some(vec![])` are different states and are stored as such.
    pub agent_log: Option<Vec<AgentLogEntry>>,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    /// Creates a message with a fresh id, stamped now, with no tool calls.
    ///
    /// # Examples
    ///
    /// ```
    /// use formfill_core::session::{ChatMessage, MessageRole};
    ///
    /// let msg = ChatMessage::new(MessageRole::User, "Hello", None);
    /// assert_eq!(msg.content, "Hello");
    /// assert!(msg.tool_calls.is_empty());
    /// assert!(msg.agent_log.is_none());
    /// ```
    pub fn new(
        role: MessageRole,
        content: impl Into<String>,
        status: Option<MessageStatus>,
    ) -> Self {
        Self {
            id: new_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            status,
            agent_log: None,
            tool_calls: Vec::new(),
        }
    }

    /// Appends an entry, creating the log if the message had none.
    pub fn push_log(&mut self, entry: AgentLogEntry) {
        self.agent_log.get_or_insert_with(Vec::new).push(entry);
    }
}

/// Factory shorthand for [`ChatMessage::new`].
pub fn new_message(
    role: MessageRole,
    content: impl Into<String>,
    status: Option<MessageStatus>,
) -> ChatMessage {
    ChatMessage::new(role, content, status)
}
