//! Agent log entries attached to assistant messages.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;

use crate::id::new_id;

/// The kind of an agent log entry.
///
/// Kinds emitted by the assistant backend are modeled as variants. Anything
/// else is preserved verbatim in `Other` so an unfamiliar kind from a newer
/// backend survives a save/load cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentLogKind {
    /// The assistant is reasoning.
    Thinking,
    /// A tool was invoked.
    ToolCall,
    /// A tool returned.
    ToolResult,
    /// Plain assistant text.
    Text,
    /// Progress/status update from the backend.
    Status,
    /// Something failed.
    Error,
    /// The run finished.
    Complete,
    /// A kind this client does not know about.
    Other(String),
}

impl AgentLogKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Thinking => "thinking",
            Self::ToolCall => "tool_call",
            Self::ToolResult => "tool_result",
            Self::Text => "text",
            Self::Status => "status",
            Self::Error => "error",
            Self::Complete => "complete",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for AgentLogKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "thinking" => Self::Thinking,
            "tool_call" => Self::ToolCall,
            "tool_result" => Self::ToolResult,
            "text" => Self::Text,
            "status" => Self::Status,
            "error" => Self::Error,
            "complete" => Self::Complete,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for AgentLogKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<AgentLogKind> for String {
    fn from(kind: AgentLogKind) -> Self {
        match kind {
            AgentLogKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AgentLogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured trace record describing an assistant action.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentLogEntry {
    pub id: String,
    pub kind: AgentLogKind,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub details: Option<String>,
    pub tool_name: Option<String>,
    /// Tool arguments; the schema belongs to the assistant, so it stays an
    /// open map.
    pub tool_input: Option<Map<String, Value>>,
}

impl AgentLogEntry {
    /// Creates an entry stamped now with a fresh id and no optional fields.
    pub fn new(kind: impl Into<AgentLogKind>, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            kind: kind.into(),
            timestamp: Utc::now(),
            content: content.into(),
            details: None,
            tool_name: None,
            tool_input: None,
        }
    }

    /// Creates a `tool_call` entry for the given tool and arguments.
    pub fn tool_call(
        tool_name: impl Into<String>,
        tool_input: Map<String, Value>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: Some(tool_name.into()),
            tool_input: Some(tool_input),
            ..Self::new(AgentLogKind::ToolCall, content)
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
