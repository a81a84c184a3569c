//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs are the stored shape of domain data. They are the only place
//! where live values (timestamps, enums) are turned into their text form, so
//! the round-trip contract lives in one module.
//!
//! The store has no schema version field. Compatibility comes from tolerance
//! instead: optional keys may be missing, unknown enum strings are kept, and
//! unknown form-field keys are carried through.

mod session;

pub use session::{
    StoredAgentLogEntry, StoredMessage, StoredSession, decode_timestamp, encode_timestamp,
};
