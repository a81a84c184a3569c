//! Session domain model.
//!
//! This module contains the Session entity: one end-to-end form-filling
//! interaction as the UI layer sees it.

use std::sync::Arc;

use super::form_field::FormField;
use super::message::ChatMessage;
use crate::id::new_id;
use crate::pdf::PdfFile;

/// A form-filling session.
///
/// A session contains:
/// - The uploaded PDF and, once the assistant has produced one, the filled PDF
/// - The detected form fields, in document order
/// - The chat history, in chat order
/// - Whether the assistant is currently working
///
/// The id is fixed at construction. PDFs and the processing flag are never
/// persisted; see the stored projection in the infrastructure crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: String,
    pub original_pdf: Option<PdfFile>,
    pub filled_pdf_bytes: Option<Arc<[u8]>>,
    pub fields: Vec<FormField>,
    pub messages: Vec<ChatMessage>,
    pub is_processing: bool,
}

impl Session {
    /// Starts a new, empty session with a freshly generated id.
    pub fn new() -> Self {
        Self::restore(new_id(), Vec::new(), Vec::new())
    }

    /// Rebuilds a session under an existing id, without PDFs.
    pub fn restore(id: impl Into<String>, fields: Vec<FormField>, messages: Vec<ChatMessage>) -> Self {
        Self {
            id: id.into(),
            original_pdf: None,
            filled_pdf_bytes: None,
            fields,
            messages,
            is_processing: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Mutable access to a message by id, for streaming updates.
    pub fn message_mut(&mut self, message_id: &str) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }

    pub fn set_fields(&mut self, fields: Vec<FormField>) {
        self.fields = fields;
    }

    pub fn set_original_pdf(&mut self, pdf: Option<PdfFile>) {
        self.original_pdf = pdf;
    }

    pub fn set_filled_pdf(&mut self, bytes: Option<Arc<[u8]>>) {
        self.filled_pdf_bytes = bytes;
    }

    pub fn set_processing(&mut self, processing: bool) {
        self.is_processing = processing;
    }

    pub fn has_filled_pdf(&self) -> bool {
        self.filled_pdf_bytes.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Factory shorthand for [`Session::new`].
pub fn new_session() -> Session {
    Session::new()
}
