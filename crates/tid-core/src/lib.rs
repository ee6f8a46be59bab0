//! Core tid primitives shared across crates.
//!
//! Includes identifier-wide constants, value types, the type fingerprinter,
//! and base errors.

pub mod error;
pub mod fingerprint;
pub mod types;

pub use error::TidError;
pub use types::{
    Mode, TagLength, TidInfo, MAX_SECRETS, MAX_TYPE_LABEL_LEN, PROTO_VERSION, TID_LEN,
    TIMESTAMP_LEN,
};
