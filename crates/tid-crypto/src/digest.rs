//! Keyed verification-tag derivation.
//!
//! The tag is the first `t` bytes of `blake3(secret || prefix)`, where the
//! prefix is everything in the identifier buffer except the tag region. The
//! footer flag occupies the low bit of the final tag byte, so that bit is
//! cleared on derivation and excluded from comparison; the effective tag
//! width is 7 bits at length 1 and 15 bits at length 2.

use tid_core::TagLength;

/// Widest supported tag in bytes.
pub const MAX_TAG_LEN: usize = 2;
/// Mask clearing the footer-flag bit of the final tag byte.
pub const FOOTER_MASK: u8 = 0xFE;

fn tag_digest(secret: &[u8], prefix: &[u8]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(secret);
    hasher.update(prefix);
    hasher.finalize()
}

/// Derives the tag bytes for `prefix` under `secret`.
///
/// Only the first `tag_length.len()` bytes of the result are meaningful; the
/// footer-flag bit of the final meaningful byte is already cleared.
pub fn derive_tag(secret: &[u8], prefix: &[u8], tag_length: TagLength) -> [u8; MAX_TAG_LEN] {
    let digest = tag_digest(secret, prefix);
    let bytes = digest.as_bytes();
    let mut tag = [0_u8; MAX_TAG_LEN];
    let len = tag_length.len();
    tag[..len].copy_from_slice(&bytes[..len]);
    tag[len - 1] &= FOOTER_MASK;
    tag
}

/// Verifies `stored_tag` (the trailing `t` buffer bytes, footer flag
/// included) against the tag derived from `prefix` under `secret`.
///
/// Comparison accumulates byte differences instead of short-circuiting, so
/// timing does not depend on where a mismatch occurs.
pub fn verify_tag(
    secret: &[u8],
    prefix: &[u8],
    stored_tag: &[u8],
    tag_length: TagLength,
) -> bool {
    let len = tag_length.len();
    if stored_tag.len() != len {
        return false;
    }
    let expected = derive_tag(secret, prefix, tag_length);

    let mut diff = 0_u8;
    for i in 0..len {
        let mask = if i == len - 1 { FOOTER_MASK } else { 0xFF };
        diff |= (stored_tag[i] & mask) ^ expected[i];
    }
    diff == 0
}
