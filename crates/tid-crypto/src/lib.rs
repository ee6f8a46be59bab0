//! Cryptographic helpers for tid.
//!
//! Includes keyed verification-tag derivation and the secret keyring.

pub mod digest;
pub mod keyring;

pub use keyring::Keyring;
