//! Pluggable time, randomness, and secret-selection providers.
//!
//! Production defaults use the system clock and the thread-local CSPRNG;
//! tests inject fixed implementations for deterministic output.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, RngCore};

/// Wall-clock source for time-sorted identifiers.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Policy choosing which configured secret signs a new identifier.
pub trait SecretSelector: Send + Sync {
    /// Picks one index out of `indices` (never empty for a built keyring).
    fn select(&self, indices: &[u8]) -> u8;
}

/// Uniform-random selection over the configured indices.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformSelector;

impl SecretSelector for UniformSelector {
    fn select(&self, indices: &[u8]) -> u8 {
        indices[rand::thread_rng().gen_range(0..indices.len())]
    }
}

/// Source of the identifier's random fill.
pub trait Entropy: Send + Sync {
    /// Fills `dest` with cryptographically secure random bytes.
    fn fill(&self, dest: &mut [u8]);
}

/// Entropy from the per-thread CSPRNG; safe for concurrent workers without
/// extra synchronization.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngEntropy;

impl Entropy for ThreadRngEntropy {
    fn fill(&self, dest: &mut [u8]) {
        rand::thread_rng().fill_bytes(dest);
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, Entropy, SecretSelector, SystemClock, ThreadRngEntropy, UniformSelector};

    #[test]
    fn system_clock_reports_current_epoch_millis() {
        // 2020-01-01 as a floor; wide upper bound to stay calendar-proof.
        let now = SystemClock.now_ms();
        assert!(now > 1_577_836_800_000);
        assert!(now < 1_577_836_800_000 * 100);
    }

    #[test]
    fn uniform_selector_only_returns_configured_indices() {
        let indices = [0_u8, 4, 9];
        for _ in 0..64 {
            assert!(indices.contains(&UniformSelector.select(&indices)));
        }
    }

    #[test]
    fn uniform_selector_is_trivial_for_a_single_index() {
        assert_eq!(UniformSelector.select(&[7]), 7);
    }

    #[test]
    fn thread_rng_entropy_fills_the_whole_buffer() {
        let mut buf = [0_u8; 64];
        ThreadRngEntropy.fill(&mut buf);
        // All-zero output over 64 bytes would mean the source is broken.
        assert!(buf.iter().any(|&b| b != 0));
    }
}
