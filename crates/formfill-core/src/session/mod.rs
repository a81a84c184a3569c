//! Session domain module.
//!
//! This module contains all session-related domain models and the store
//! interface used to cache them.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `message`: Chat message types (`MessageRole`, `MessageStatus`, `ChatMessage`, `ToolCall`)
//! - `agent_log`: Assistant trace records (`AgentLogEntry`, `AgentLogKind`)
//! - `form_field`: Pass-through field descriptors (`FormField`)
//! - `repository`: Store trait and the loaded projection (`SessionStore`, `LoadedSession`)
//!
//! # Usage
//!
//! ```
//! use formfill_core::session::{new_message, new_session, MessageRole};
//!
//! let mut session = new_session();
//! session.push_message(new_message(MessageRole::User, "Fill in my name", None));
//! assert_eq!(session.messages.len(), 1);
//! ```

mod agent_log;
mod form_field;
mod message;
mod model;
mod repository;

// Re-export public API
pub use agent_log::{AgentLogEntry, AgentLogKind};
pub use form_field::FormField;
pub use message::{ChatMessage, MessageRole, MessageStatus, ToolCall, new_message};
pub use model::{Session, new_session};
pub use repository::{LoadedSession, SessionStore};
