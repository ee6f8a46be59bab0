//! One-byte type fingerprints.
//!
//! Reduces a caller-supplied type label to a CRC-8 checksum (polynomial 0x07,
//! init 0x00, MSB first) and memoizes the result in a process-wide map. The
//! label set is expected to be small and stable, so entries are never evicted.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// Computes the CRC-8 checksum of `bytes` (poly 0x07, init 0x00, no
/// reflection, no final xor).
pub fn crc8(bytes: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for byte in bytes {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn cache() -> &'static RwLock<HashMap<Vec<u8>, u8>> {
    static CACHE: OnceLock<RwLock<HashMap<Vec<u8>, u8>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Returns the fingerprint for `label`, computing and caching it on first use.
///
/// Concurrent callers may race to compute the same entry; both arrive at the
/// same value, so last-write-wins insertion is fine. A poisoned cache lock
/// degrades to plain recomputation.
pub fn fingerprint(label: &[u8]) -> u8 {
    if let Ok(map) = cache().read() {
        if let Some(&cached) = map.get(label) {
            return cached;
        }
    }

    let value = crc8(label);
    if let Ok(mut map) = cache().write() {
        map.entry(label.to_vec()).or_insert(value);
    }
    value
}
