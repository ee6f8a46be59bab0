use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TidError;

/// Identifier length in bytes (one standard 128-bit UUID container).
pub const TID_LEN: usize = 16;
/// Maximum number of configurable secrets (4-bit index space).
pub const MAX_SECRETS: usize = 16;
/// Protocol version embedded in every generated identifier (3 bits).
pub const PROTO_VERSION: u8 = 1;
/// Maximum type label length in bytes.
pub const MAX_TYPE_LABEL_LEN: usize = 255;
/// Length of the big-endian millisecond timestamp field.
pub const TIMESTAMP_LEN: usize = 6;

/// Identifier generation mode, encoded as a single bit in the info byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// The timestamp region is filled with extra randomness.
    Random,
    /// The first six bytes carry a big-endian millisecond epoch, making raw
    /// identifier bytes sort by creation time.
    TimeSorted,
}

impl Mode {
    /// Returns the info-byte bit value for this mode.
    pub fn bit(self) -> u8 {
        match self {
            Mode::Random => 0,
            Mode::TimeSorted => 1,
        }
    }

    /// Maps an info-byte bit back to a mode. Both bit values are meaningful,
    /// so this cannot fail.
    pub fn from_bit(bit: u8) -> Self {
        if bit & 0x01 == 0 {
            Mode::Random
        } else {
            Mode::TimeSorted
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Random => f.write_str("random"),
            Mode::TimeSorted => f.write_str("time-sorted"),
        }
    }
}

impl FromStr for Mode {
    type Err = TidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Mode::Random),
            "time-sorted" => Ok(Mode::TimeSorted),
            _ => Err(TidError::InvalidInput(
                "mode must be \"random\" or \"time-sorted\"",
            )),
        }
    }
}

/// Verification tag length, encoded as the footer flag bit.
///
/// The enum keeps out-of-range lengths unrepresentable in the codec API;
/// integer boundaries (CLI flags, config files) go through [`TryFrom<u8>`]
/// and fail loudly before any buffer work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagLength {
    One,
    Two,
}

impl TagLength {
    /// Tag length in bytes.
    pub fn len(self) -> usize {
        match self {
            TagLength::One => 1,
            TagLength::Two => 2,
        }
    }

    /// Footer flag bit value written into the last byte of the buffer.
    pub fn footer_flag(self) -> u8 {
        match self {
            TagLength::One => 0,
            TagLength::Two => 1,
        }
    }

    /// Maps a footer flag bit back to the tag length it declares.
    pub fn from_footer_flag(bit: u8) -> Self {
        if bit & 0x01 == 0 {
            TagLength::One
        } else {
            TagLength::Two
        }
    }
}

impl TryFrom<u8> for TagLength {
    type Error = TidError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TagLength::One),
            2 => Ok(TagLength::Two),
            _ => Err(TidError::InvalidInput("tag length must be 1 or 2")),
        }
    }
}

/// Decoded identifier fields, produced fresh per decode call.
///
/// `valid_tag && type_matches` is the overall accept signal; the remaining
/// fields reflect whatever bits were present regardless of validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TidInfo {
    /// Verification tag matched under the embedded secret index and the
    /// current protocol version.
    pub valid_tag: bool,
    /// Stored type fingerprint matched the expected type label.
    pub type_matches: bool,
    /// Embedded millisecond epoch (48-bit), or 0 for [`Mode::Random`].
    pub timestamp_ms: u64,
    /// Secret index claimed by the info byte (0-15, unauthenticated).
    pub secret_index: u8,
    /// Generation mode claimed by the info byte.
    pub mode: Mode,
    /// Protocol version claimed by the info byte (0-7).
    pub version: u8,
}
