//! Address-bar port.
//!
//! The page address is the one piece of session state that can be shared as
//! a link. This trait is the narrow window onto it.

use crate::error::Result;

/// The current page address and its session history.
pub trait AddressBar: Send + Sync {
    /// The full current address.
    fn href(&self) -> String;

    /// Replaces the current history entry with `href` without navigating.
    fn replace_state(&self, href: &str) -> Result<()>;
}
