//! Key-value storage port.
//!
//! Models the browser's local storage: string keys, string values,
//! synchronous access and a finite total capacity.

use crate::error::Result;

/// A size-limited, synchronous string key-value store.
///
/// Writes may fail with [`FormFillError::QuotaExceeded`] and any call may fail
/// with [`FormFillError::StorageUnavailable`].
///
/// [`FormFillError::QuotaExceeded`]: crate::error::FormFillError::QuotaExceeded
/// [`FormFillError::StorageUnavailable`]: crate::error::FormFillError::StorageUnavailable
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
