//! Application layer for the form filler.
//!
//! Use cases that coordinate the domain and infrastructure layers: resuming
//! a session on page load, caching it after changes, and managing the PDF
//! preview.

pub mod bootstrap;
pub mod logging;
pub mod preview;
pub mod resume;

pub use bootstrap::{FormFillContext, HostPorts, file_storage, load_config};
pub use logging::init_logging;
pub use preview::PdfPreview;
pub use resume::{ResumedSession, SessionOrigin, SessionResumer};
