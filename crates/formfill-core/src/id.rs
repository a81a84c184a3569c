//! Identity generation for sessions, messages and log entries.
//!
//! Ids are random lowercase base-36 strings. They are unique enough for one
//! browser profile's worth of sessions and safe to use unescaped as a map key
//! or URL query value. There is no collision check and no coordination.

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of every generated id (~113 bits of randomness).
pub const ID_LENGTH: usize = 22;

/// Produces a new locally-unique identifier.
///
/// # Examples
///
/// ```
/// use formfill_core::id::{new_id, ID_LENGTH};
///
/// let id = new_id();
/// assert_eq!(id.len(), ID_LENGTH);
/// assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
/// ```
pub fn new_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
