use std::fmt;

use tid_core::{TidError, MAX_SECRETS};

/// Immutable store of signing secrets indexed 0-15.
///
/// Built once at construction and never mutated; an invalid configuration is
/// rejected before any identifier can be produced or verified with it.
pub struct Keyring {
    secrets: [Option<Vec<u8>>; MAX_SECRETS],
    indices: Vec<u8>,
}

impl Keyring {
    /// Builds a keyring from `(index, secret)` pairs.
    ///
    /// Requires 1-16 entries, every index in `[0, 16)`, distinct indices,
    /// and non-empty secrets.
    pub fn new<I>(entries: I) -> Result<Self, TidError>
    where
        I: IntoIterator<Item = (u8, Vec<u8>)>,
    {
        const EMPTY: Option<Vec<u8>> = None;
        let mut secrets = [EMPTY; MAX_SECRETS];
        let mut indices = Vec::new();

        for (index, secret) in entries {
            if index as usize >= MAX_SECRETS {
                return Err(TidError::InvalidKeyring("secret index must be 0-15"));
            }
            if secret.is_empty() {
                return Err(TidError::InvalidKeyring("secret must not be empty"));
            }
            if secrets[index as usize].is_some() {
                return Err(TidError::InvalidKeyring("duplicate secret index"));
            }
            secrets[index as usize] = Some(secret);
            indices.push(index);
        }

        if indices.is_empty() {
            return Err(TidError::InvalidKeyring("at least one secret is required"));
        }
        indices.sort_unstable();

        Ok(Self { secrets, indices })
    }

    /// Resolves a secret index to its bytes.
    ///
    /// Returns `None` for a structurally valid index that was never
    /// configured; decode treats that as an invalid tag, not an error.
    pub fn secret(&self, index: u8) -> Option<&[u8]> {
        self.secrets
            .get(index as usize)
            .and_then(|slot| slot.as_deref())
    }

    /// Configured indices in ascending order, for selection policies.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Number of configured secrets.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false for a constructed keyring; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// Secret bytes stay out of Debug output.
impl fmt::Debug for Keyring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyring")
            .field("indices", &self.indices)
            .finish_non_exhaustive()
    }
}
