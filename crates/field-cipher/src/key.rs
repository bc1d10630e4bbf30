//! [`FieldKey`]: the process-wide 256-bit field-encryption key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ConfigError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Fixed-size buffer holding exactly [`KEY_LEN`] bytes of key material.
///
/// Loaded once at process startup and never mutated afterwards. When the
/// value is dropped, the memory is overwritten with zeroes to minimise the
/// window during which plaintext key material lives in RAM.
///
/// There is intentionally no `Clone`: one process, one key, one owner. Hand
/// the derived [`FieldCipher`](crate::FieldCipher) around instead.
pub struct FieldKey(Box<[u8; KEY_LEN]>);

impl FieldKey {
    /// Wrap raw key material.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Box::new(bytes))
    }

    /// Decode a key from its standard base64 representation.
    ///
    /// Surrounding whitespace is trimmed first; a trailing newline from an
    /// env file would otherwise surface as a length error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKeyEncoding`] if the input is not valid
    /// base64, or [`ConfigError::InvalidKeyLength`] if the decoded material
    /// is not exactly [`KEY_LEN`] bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, ConfigError> {
        let mut decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| ConfigError::InvalidKeyEncoding)?;

        if decoded.len() != KEY_LEN {
            return Err(ConfigError::InvalidKeyLength { got: decoded.len() });
        }

        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(&decoded);

        // Zero the intermediate copy before it is freed.
        decoded.iter_mut().for_each(|b| *b = 0);

        Ok(Self(buf))
    }

    /// Borrow the raw key bytes for cipher construction.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for FieldKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("FieldKey([REDACTED])")
    }
}
