//! Field placement inside the 16-byte identifier buffer.
//!
//! All offsets are functions of the verification tag length `t`:
//!
//! ```text
//! byte  0..6     millisecond timestamp (time-sorted mode) or randomness
//! byte  6..14-t  randomness
//! byte  14-t     type fingerprint
//! byte  15-t     info byte: iiii vvvm (secret index, version, mode)
//! byte  16-t..16 verification tag; low bit of byte 15 is the footer flag
//! ```
//!
//! The footer flag sits at a fixed position independent of `t`, so decoding
//! always reads it first to learn where the other fields live.

use tid_core::{Mode, TagLength, TID_LEN, TIMESTAMP_LEN};

const INFO_SECRET_SHIFT: u8 = 4;
const INFO_VERSION_SHIFT: u8 = 1;
const INFO_VERSION_MASK: u8 = 0x07;
const INFO_MODE_MASK: u8 = 0x01;

/// Offset of the type fingerprint byte.
pub fn fingerprint_offset(tag_length: TagLength) -> usize {
    TID_LEN - 2 - tag_length.len()
}

/// Offset of the packed info byte.
pub fn info_offset(tag_length: TagLength) -> usize {
    TID_LEN - 1 - tag_length.len()
}

/// Offset where the verification tag begins.
pub fn tag_offset(tag_length: TagLength) -> usize {
    TID_LEN - tag_length.len()
}

/// The buffer prefix covered by the verification tag.
pub fn signed_prefix(buf: &[u8; TID_LEN], tag_length: TagLength) -> &[u8] {
    &buf[..tag_offset(tag_length)]
}

/// Writes the 48-bit big-endian millisecond timestamp into bytes `[0, 6)`.
/// Values wider than 48 bits are truncated to their low 48.
pub fn write_timestamp_ms(buf: &mut [u8; TID_LEN], timestamp_ms: u64) {
    let be = timestamp_ms.to_be_bytes();
    buf[..TIMESTAMP_LEN].copy_from_slice(&be[8 - TIMESTAMP_LEN..]);
}

/// Reads the 48-bit big-endian millisecond timestamp from bytes `[0, 6)`.
pub fn read_timestamp_ms(buf: &[u8; TID_LEN]) -> u64 {
    let mut be = [0_u8; 8];
    be[8 - TIMESTAMP_LEN..].copy_from_slice(&buf[..TIMESTAMP_LEN]);
    u64::from_be_bytes(be)
}

/// Writes the type fingerprint byte.
pub fn write_fingerprint(buf: &mut [u8; TID_LEN], tag_length: TagLength, fingerprint: u8) {
    buf[fingerprint_offset(tag_length)] = fingerprint;
}

/// Reads the type fingerprint byte.
pub fn read_fingerprint(buf: &[u8; TID_LEN], tag_length: TagLength) -> u8 {
    buf[fingerprint_offset(tag_length)]
}

/// Packs secret index, protocol version, and mode into one info byte.
/// Out-of-range inputs are masked to their field widths.
pub fn pack_info(secret_index: u8, version: u8, mode: Mode) -> u8 {
    (secret_index << INFO_SECRET_SHIFT)
        | ((version & INFO_VERSION_MASK) << INFO_VERSION_SHIFT)
        | mode.bit()
}

/// Unpacks an info byte into `(secret_index, version, mode)`.
pub fn unpack_info(info: u8) -> (u8, u8, Mode) {
    let secret_index = info >> INFO_SECRET_SHIFT;
    let version = (info >> INFO_VERSION_SHIFT) & INFO_VERSION_MASK;
    let mode = Mode::from_bit(info & INFO_MODE_MASK);
    (secret_index, version, mode)
}

/// Writes the packed info byte.
pub fn write_info(buf: &mut [u8; TID_LEN], tag_length: TagLength, info: u8) {
    buf[info_offset(tag_length)] = info;
}

/// Reads the packed info byte.
pub fn read_info(buf: &[u8; TID_LEN], tag_length: TagLength) -> u8 {
    buf[info_offset(tag_length)]
}

/// Reads the footer flag from the fixed last-byte position and returns the
/// tag length it declares.
pub fn read_footer_tag_length(buf: &[u8; TID_LEN]) -> TagLength {
    TagLength::from_footer_flag(buf[TID_LEN - 1])
}
