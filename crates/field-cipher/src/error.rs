//! Error types for key configuration and per-field cipher operations.
//!
//! Messages never include key material, plaintext, ciphertext, or nonces;
//! the fields being protected are exactly the ones that must not end up in
//! logs or error reports.

use thiserror::Error;

use crate::key::KEY_LEN;

/// Errors raised while loading the field-encryption key at startup.
///
/// All of these are fatal: a process that cannot build a
/// [`FieldCipher`](crate::FieldCipher) must not serve any request that reads
/// or writes encrypted columns.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `DATA_ENCRYPTION_KEY` is absent or empty.
    #[error("DATA_ENCRYPTION_KEY is required and must not be empty")]
    MissingKey,

    /// The configured key is not valid standard base64.
    #[error("DATA_ENCRYPTION_KEY is not valid base64")]
    InvalidKeyEncoding,

    /// The configured key decodes to the wrong number of bytes.
    #[error("key has invalid length: expected {KEY_LEN} bytes, got {got}")]
    InvalidKeyLength {
        /// Decoded length that was actually found.
        got: usize,
    },
}

/// Per-call errors produced by [`FieldCipher`](crate::FieldCipher) operations.
///
/// Every variant is non-retryable: retrying with the same input fails the
/// same way. Callers should treat any decryption failure as a data-integrity
/// incident for that one field, not a transient fault.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The envelope is not valid base64, or decodes to fewer than
    /// [`ENVELOPE_OVERHEAD`](crate::envelope::ENVELOPE_OVERHEAD) bytes.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    /// GCM tag verification failed: the ciphertext or tag was altered at
    /// rest, or a different key was used. No plaintext is returned.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The authenticated plaintext is not valid UTF-8. Treated as a
    /// corruption signal, with the same handling as an authentication
    /// failure.
    #[error("decrypted field is not valid UTF-8")]
    InvalidEncoding,

    /// The AEAD encryption call itself failed (not expected with a validated
    /// key and a fresh 12-byte nonce).
    #[error("aead encryption failed")]
    EncryptionFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_messages_name_the_variable() {
        assert!(ConfigError::MissingKey.to_string().contains("DATA_ENCRYPTION_KEY"));
        assert!(ConfigError::InvalidKeyEncoding
            .to_string()
            .contains("DATA_ENCRYPTION_KEY"));
    }

    #[test]
    fn key_length_message_includes_lengths() {
        let e = ConfigError::InvalidKeyLength { got: 16 };
        let msg = e.to_string();
        assert!(msg.contains("32"));
        assert!(msg.contains("16"));
    }

    #[test]
    fn cipher_messages_carry_no_payload_data() {
        let e = CipherError::MalformedEnvelope("decoded payload too short");
        assert_eq!(e.to_string(), "malformed envelope: decoded payload too short");
        assert_eq!(CipherError::AuthenticationFailed.to_string(), "authentication failed");
    }
}
