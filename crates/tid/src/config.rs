//! Keyring configuration loading.
//!
//! The surrounding application supplies secrets as a TOML table; loading
//! validates the table into a [`Keyring`] before any identifier work starts.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tid_core::{Mode, TagLength, TidError};
use tid_crypto::Keyring;

/// Errors returned while loading keyring configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
    /// Configuration file is not valid TOML for the expected model.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A `[secrets]` key is not an unsigned integer.
    #[error("invalid secret index: {0:?}")]
    InvalidIndex(String),
    /// Validated values violate keyring or field constraints.
    #[error(transparent)]
    Invalid(#[from] TidError),
}

/// Keyring file model.
///
/// ```toml
/// default_mode = "time-sorted"
/// default_tag_length = 2
///
/// [secrets]
/// 0 = "topSecret"
/// 7 = "rotatedSecret"
/// ```
#[derive(Debug, Deserialize)]
pub struct KeyringConfig {
    #[serde(default)]
    pub default_mode: Option<Mode>,
    #[serde(default)]
    pub default_tag_length: Option<u8>,
    pub secrets: BTreeMap<String, String>,
}

impl KeyringConfig {
    /// Parses the TOML model from a string.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Reads and parses the TOML model from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Validates the secret table into a keyring.
    pub fn build_keyring(&self) -> Result<Keyring, ConfigError> {
        let mut entries = Vec::with_capacity(self.secrets.len());
        for (key, secret) in &self.secrets {
            let index: u8 = key
                .parse()
                .map_err(|_| ConfigError::InvalidIndex(key.clone()))?;
            entries.push((index, secret.clone().into_bytes()));
        }
        Ok(Keyring::new(entries)?)
    }

    /// Tag length to use when the caller does not specify one.
    pub fn default_tag_length(&self) -> Result<Option<TagLength>, ConfigError> {
        self.default_tag_length
            .map(TagLength::try_from)
            .transpose()
            .map_err(ConfigError::from)
    }
}
