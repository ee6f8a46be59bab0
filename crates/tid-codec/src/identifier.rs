use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tid_core::{TidError, TID_LEN};

/// Hyphen positions of the canonical 8-4-4-4-12 text form.
const TEXT_GROUPS: [(usize, usize); 5] = [(0, 8), (8, 12), (12, 16), (16, 20), (20, 32)];

/// A packed 128-bit identifier.
///
/// Value type with no identity beyond its bits; the byte order matches a
/// standard UUID container (big-endian within each 64-bit half), so it
/// round-trips through any system that stores or transports UUIDs opaquely.
/// Raw-byte ordering equals numeric ordering, which is what makes
/// time-sorted identifiers sortable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tid([u8; TID_LEN]);

impl Tid {
    /// Wraps a 16-byte buffer.
    pub const fn from_bytes(bytes: [u8; TID_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrows the underlying bytes.
    pub const fn as_bytes(&self) -> &[u8; TID_LEN] {
        &self.0
    }

    /// Returns the identifier as a big-endian 128-bit value.
    pub fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Builds an identifier from a big-endian 128-bit value.
    pub fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = hex::encode(self.0);
        let mut first = true;
        for (start, end) in TEXT_GROUPS {
            if !first {
                f.write_str("-")?;
            }
            f.write_str(&hex[start..end])?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Tid {
    type Err = TidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| *c != '-').collect();
        let raw =
            hex::decode(&compact).map_err(|_| TidError::InvalidInput("identifier is not hex"))?;
        let bytes: [u8; TID_LEN] = raw
            .try_into()
            .map_err(|_| TidError::InvalidInput("identifier must be exactly 16 bytes"))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Tid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Tid;

    #[test]
    fn display_uses_canonical_hyphenated_form() {
        let tid = Tid::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0x01, 0x23, 0x45, 0x67, 0x89, 0xAB,
            0xCD, 0xEF,
        ]);
        assert_eq!(tid.to_string(), "01234567-89ab-cdef-0123-456789abcdef");
    }

    #[test]
    fn parses_hyphenated_and_compact_forms() {
        let canonical = "01234567-89ab-cdef-0123-456789abcdef";
        let tid: Tid = canonical.parse().expect("canonical form should parse");
        assert_eq!(tid.to_string(), canonical);

        let compact: Tid = "0123456789abcdef0123456789abcdef"
            .parse()
            .expect("compact form should parse");
        assert_eq!(compact, tid);
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        assert!("0123".parse::<Tid>().is_err());
        assert!("zz234567-89ab-cdef-0123-456789abcdef".parse::<Tid>().is_err());
        assert!("01234567-89ab-cdef-0123-456789abcdef00"
            .parse::<Tid>()
            .is_err());
    }

    #[test]
    fn u128_conversion_is_big_endian() {
        let tid = Tid::from_u128(0x0102_0304_0506_0708_090A_0B0C_0D0E_0F10);
        assert_eq!(tid.as_bytes()[0], 0x01);
        assert_eq!(tid.as_bytes()[15], 0x10);
        assert_eq!(tid.to_u128(), 0x0102_0304_0506_0708_090A_0B0C_0D0E_0F10);
    }

    #[test]
    fn raw_byte_order_equals_numeric_order() {
        let low = Tid::from_u128(0x01);
        let high = Tid::from_u128(0x0100_0000_0000_0000_0000_0000_0000_0000);
        assert!(low < high);
        assert!(low.as_bytes() < high.as_bytes());
    }

    #[test]
    fn serde_round_trips_through_string_form() {
        let tid = Tid::from_u128(0xDEAD_BEEF_0000_0000_0000_0000_0000_0001);
        let json = serde_json::to_string(&tid).expect("serialize");
        assert_eq!(json, format!("\"{tid}\""));
        let back: Tid = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, tid);
    }
}
