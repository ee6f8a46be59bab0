//! Self-describing 128-bit tagged identifiers.
//!
//! [`TidCodec`] packs an optional millisecond timestamp, secure randomness, a
//! one-byte type fingerprint, a packed info byte, and a keyed verification
//! tag into one UUID-shaped value, then decodes and authenticates it without
//! any external lookup.
//!
//! The verification tag is a probabilistic origin/corruption filter (7 or 15
//! effective bits), not cryptographic proof of identity.

pub mod config;
pub mod providers;

use serde::Serialize;
use tid_codec::layout;
use tid_core::fingerprint::fingerprint;
use tid_core::{MAX_TYPE_LABEL_LEN, TID_LEN, TIMESTAMP_LEN};
use tid_crypto::digest;
use tracing::trace;

use crate::providers::{
    Clock, Entropy, SecretSelector, SystemClock, ThreadRngEntropy, UniformSelector,
};

pub use tid_codec::Tid;
pub use tid_core::{Mode, TagLength, TidError, TidInfo, PROTO_VERSION};
pub use tid_crypto::Keyring;

/// Generates and decodes tagged identifiers against one keyring.
///
/// Construction fixes the keyring for the codec's lifetime; `generate` and
/// `decode` are independent, synchronous, and safe to call from concurrent
/// workers (working buffers are per-call).
pub struct TidCodec {
    keyring: Keyring,
    clock: Box<dyn Clock>,
    selector: Box<dyn SecretSelector>,
    entropy: Box<dyn Entropy>,
}

impl TidCodec {
    /// Creates a codec with production providers (system clock, uniform
    /// secret selection, thread-local CSPRNG).
    pub fn new(keyring: Keyring) -> Self {
        Self::with_providers(
            keyring,
            Box::new(SystemClock),
            Box::new(UniformSelector),
            Box::new(ThreadRngEntropy),
        )
    }

    /// Creates a codec with injected providers, for deterministic tests.
    pub fn with_providers(
        keyring: Keyring,
        clock: Box<dyn Clock>,
        selector: Box<dyn SecretSelector>,
        entropy: Box<dyn Entropy>,
    ) -> Self {
        Self {
            keyring,
            clock,
            selector,
            entropy,
        }
    }

    /// The keyring this codec signs and verifies with.
    pub fn keyring(&self) -> &Keyring {
        &self.keyring
    }

    /// Generates a new identifier tagged for `type_label`.
    ///
    /// Packing order is timestamp, randomness, fingerprint, info byte, then
    /// the tag, which signs everything written before it.
    pub fn generate(
        &self,
        type_label: &[u8],
        mode: Mode,
        tag_length: TagLength,
    ) -> Result<Tid, TidError> {
        check_type_label(type_label)?;

        let secret_index = self.selector.select(self.keyring.indices());
        let secret = self.keyring.secret(secret_index).ok_or(TidError::InvalidInput(
            "selector returned an unconfigured secret index",
        ))?;

        let mut buf = [0_u8; TID_LEN];
        let random_start = match mode {
            Mode::TimeSorted => {
                layout::write_timestamp_ms(&mut buf, self.clock.now_ms());
                TIMESTAMP_LEN
            }
            Mode::Random => 0,
        };
        self.entropy
            .fill(&mut buf[random_start..layout::tag_offset(tag_length)]);
        layout::write_fingerprint(&mut buf, tag_length, fingerprint(type_label));
        layout::write_info(
            &mut buf,
            tag_length,
            layout::pack_info(secret_index, PROTO_VERSION, mode),
        );

        let tag = digest::derive_tag(secret, layout::signed_prefix(&buf, tag_length), tag_length);
        buf[layout::tag_offset(tag_length)..].copy_from_slice(&tag[..tag_length.len()]);
        buf[TID_LEN - 1] |= tag_length.footer_flag();

        trace!(
            mode = %mode,
            tag_length = tag_length.len(),
            secret_index,
            "generated identifier"
        );
        Ok(Tid::from_bytes(buf))
    }

    /// Decodes `tid` and checks it against `expected_type`.
    ///
    /// Malformed or adversarial identifier bits never fail this call; trust
    /// outcomes surface as `valid_tag`/`type_matches` on the result. Only
    /// the expected-type precondition can error.
    pub fn decode(&self, tid: &Tid, expected_type: &[u8]) -> Result<TidInfo, TidError> {
        check_type_label(expected_type)?;

        let buf = tid.as_bytes();
        let tag_length = layout::read_footer_tag_length(buf);
        let (secret_index, version, mode) = layout::unpack_info(layout::read_info(buf, tag_length));

        let expected_fingerprint = fingerprint(expected_type);
        let type_matches = layout::read_fingerprint(buf, tag_length) == expected_fingerprint;

        // Verify over the prefix with the expected type's fingerprint in
        // place, so the tag check binds to the caller's type as well.
        let mut expected_buf = *buf;
        layout::write_fingerprint(&mut expected_buf, tag_length, expected_fingerprint);

        let tag_ok = match self.keyring.secret(secret_index) {
            Some(secret) => digest::verify_tag(
                secret,
                layout::signed_prefix(&expected_buf, tag_length),
                &buf[layout::tag_offset(tag_length)..],
                tag_length,
            ),
            None => false,
        };
        let valid_tag = tag_ok && version == PROTO_VERSION;

        let timestamp_ms = match mode {
            Mode::TimeSorted => layout::read_timestamp_ms(buf),
            Mode::Random => 0,
        };

        trace!(
            valid_tag,
            type_matches,
            secret_index,
            version,
            "decoded identifier"
        );
        Ok(TidInfo {
            valid_tag,
            type_matches,
            timestamp_ms,
            secret_index,
            mode,
            version,
        })
    }
}

/// Unauthenticated structural fields of an identifier.
///
/// Everything here is attacker-controlled until the tag verifies; it exists
/// for diagnostics, not trust decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TidStructure {
    pub tag_length: u8,
    pub secret_index: u8,
    pub version: u8,
    pub mode: Mode,
    pub timestamp_ms: u64,
}

/// Reads the structural fields of `tid` without a keyring.
pub fn inspect(tid: &Tid) -> TidStructure {
    let buf = tid.as_bytes();
    let tag_length = layout::read_footer_tag_length(buf);
    let (secret_index, version, mode) = layout::unpack_info(layout::read_info(buf, tag_length));
    let timestamp_ms = match mode {
        Mode::TimeSorted => layout::read_timestamp_ms(buf),
        Mode::Random => 0,
    };
    TidStructure {
        tag_length: tag_length.len() as u8,
        secret_index,
        version,
        mode,
        timestamp_ms,
    }
}

fn check_type_label(label: &[u8]) -> Result<(), TidError> {
    if label.len() > MAX_TYPE_LABEL_LEN {
        return Err(TidError::InvalidInput("type label exceeds 255 bytes"));
    }
    Ok(())
}
