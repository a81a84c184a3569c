//! Domain layer for the form filler client.
//!
//! Sessions, chat messages, agent logs and the ports (storage, address bar,
//! object URLs) through which they are cached, shared and displayed.

pub mod config;
pub mod error;
pub mod id;
pub mod location;
pub mod pdf;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::FormFillError;
