//! Configuration loading and validation for the field cipher.
//!
//! The single configuration value is read from the environment at startup.
//! The embedding process must treat any error here as fatal and refuse to
//! serve requests that depend on encrypted columns.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::key::FieldKey;

/// Validated cipher configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base64-encoded 256-bit field-encryption key. **Required.**
    pub data_encryption_key: String,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if `DATA_ENCRYPTION_KEY` is
    /// absent or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .map_err(|_| ConfigError::MissingKey)?;

        let c: Config = cfg.try_deserialize().map_err(|_| ConfigError::MissingKey)?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_encryption_key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }
        Ok(())
    }

    /// Decode the configured key into a validated [`FieldKey`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKeyEncoding`] or
    /// [`ConfigError::InvalidKeyLength`] if the configured value is not a
    /// base64-encoded 32-byte key.
    pub fn field_key(&self) -> Result<FieldKey, ConfigError> {
        FieldKey::from_base64(&self.data_encryption_key)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The key is a secret; keep it out of debug output and logs.
        f.debug_struct("Config")
            .field("data_encryption_key", &"[REDACTED]")
            .finish()
    }
}
