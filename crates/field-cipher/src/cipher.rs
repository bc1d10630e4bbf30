//! AES-256-GCM encryption and decryption of individual string fields.
//!
//! [`FieldCipher`] is built once at process startup from the configured key
//! and then shared by reference. Both operations are synchronous, touch no
//! shared mutable state, and are safe to call from any number of threads or
//! tasks concurrently.
//!
//! **Nonce strategy:** every call draws a fresh random 96-bit nonce from the
//! OS CSPRNG. There is no counter and no durable nonce state, so nonce
//! uniqueness is probabilistic (~2⁻³² collision odds over the realistic
//! message volume of one key). Nothing bounds the total number of messages
//! encrypted per key; rotating the key is out of scope here and an envelope
//! carries no key identifier, so any future rotation needs an out-of-band
//! key history.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use tracing::info;

use crate::config::Config;
use crate::envelope::{Envelope, NONCE_LEN, TAG_LEN};
use crate::error::{CipherError, ConfigError};
use crate::key::FieldKey;

/// AES-256-GCM cipher over individual incident fields.
///
/// Holds the expanded key schedule for the process-wide key; the key itself
/// is not retained. Share one instance by reference (or inside an `Arc`)
/// across concurrent callers; no locking is required.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl FieldCipher {
    /// Build a cipher from a validated [`FieldKey`].
    pub fn new(key: &FieldKey) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes())),
        }
    }

    /// Load the key from `DATA_ENCRYPTION_KEY` and build the cipher.
    ///
    /// Call once at process startup. Any error is fatal: the process must
    /// not serve requests that read or write encrypted columns without a
    /// working cipher.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the variable is missing or empty, not
    /// valid base64, or does not decode to exactly 32 bytes.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cfg = Config::from_env()?;
        let key = cfg.field_key()?;
        info!("field encryption key loaded");
        Ok(Self::new(&key))
    }

    /// Encrypt a plaintext field into a self-contained base64 envelope.
    ///
    /// A fresh nonce is generated per call, so encrypting the same plaintext
    /// twice yields two different envelopes, both of which decrypt back to
    /// the same string. The empty string is a valid input.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::EncryptionFailed`] on an internal AEAD error
    /// (not expected with a validated key).
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String, CipherError> {
        self.seal(plaintext.as_bytes())
    }

    /// Decrypt a base64 envelope back to its plaintext field.
    ///
    /// # Errors
    ///
    /// - [`CipherError::MalformedEnvelope`]: not valid base64, or decodes to
    ///   fewer than 28 bytes.
    /// - [`CipherError::AuthenticationFailed`]: the ciphertext or tag was
    ///   altered at rest, or a different key was used. No partial plaintext
    ///   is ever returned.
    /// - [`CipherError::InvalidEncoding`]: the authenticated plaintext is
    ///   not valid UTF-8 (treated as corruption, not recovered).
    pub fn decrypt_field(&self, envelope: &str) -> Result<String, CipherError> {
        let envelope = Envelope::decode(envelope)?;

        // Reassemble ciphertext || tag, the layout the aead API verifies.
        let mut sealed = Vec::with_capacity(envelope.ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(&envelope.ciphertext);
        sealed.extend_from_slice(&envelope.tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&envelope.nonce), sealed.as_slice())
            .map_err(|_| CipherError::AuthenticationFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidEncoding)
    }

    /// Encrypt each element of a list independently.
    ///
    /// Used for mitigation-step lists: every step becomes its own envelope,
    /// so a single corrupt element never takes its siblings down with it.
    ///
    /// # Errors
    ///
    /// Returns the first [`CipherError`] encountered, if any.
    pub fn encrypt_fields(&self, fields: &[impl AsRef<str>]) -> Result<Vec<String>, CipherError> {
        fields
            .iter()
            .map(|field| self.encrypt_field(field.as_ref()))
            .collect()
    }

    /// Decrypt each element of a list independently.
    ///
    /// # Errors
    ///
    /// Returns the first [`CipherError`] encountered, if any.
    pub fn decrypt_fields(&self, envelopes: &[impl AsRef<str>]) -> Result<Vec<String>, CipherError> {
        envelopes
            .iter()
            .map(|envelope| self.decrypt_field(envelope.as_ref()))
            .collect()
    }

    fn seal(&self, plaintext: &[u8]) -> Result<String, CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        // The aead API returns ciphertext || tag; the envelope stores the
        // tag between the nonce and the ciphertext.
        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CipherError::EncryptionFailed)?;
        let split = sealed.len() - TAG_LEN;

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&sealed[split..]);

        Ok(Envelope {
            nonce,
            tag,
            ciphertext: sealed[..split].to_vec(),
        }
        .encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KEY_LEN;

    fn random_cipher() -> FieldCipher {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        FieldCipher::new(&FieldKey::from_bytes(key))
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let fc = random_cipher();
        let plaintext = "Suspicious login attempts from several unknown hosts.";
        let envelope = fc.encrypt_field(plaintext).unwrap();
        assert_eq!(fc.decrypt_field(&envelope).unwrap(), plaintext);
    }

    #[test]
    fn round_trip_empty_string() {
        let fc = random_cipher();
        let envelope = fc.encrypt_field("").unwrap();
        assert_eq!(fc.decrypt_field(&envelope).unwrap(), "");
    }

    #[test]
    fn round_trip_multibyte_utf8() {
        let fc = random_cipher();
        let plaintext = "инцидент: фишинг 📧 — ça visait la comptabilité";
        let envelope = fc.encrypt_field(plaintext).unwrap();
        assert_eq!(fc.decrypt_field(&envelope).unwrap(), plaintext);
    }

    #[test]
    fn different_envelope_each_time() {
        let fc = random_cipher();
        let enc1 = fc.encrypt_field("same input").unwrap();
        let enc2 = fc.encrypt_field("same input").unwrap();
        assert_ne!(enc1, enc2);
        assert_eq!(fc.decrypt_field(&enc1).unwrap(), "same input");
        assert_eq!(fc.decrypt_field(&enc2).unwrap(), "same input");
    }

    #[test]
    fn wrong_key_fails() {
        let fc1 = random_cipher();
        let fc2 = random_cipher();
        let envelope = fc1.encrypt_field("secret").unwrap();
        let err = fc2.decrypt_field(&envelope).unwrap_err();
        assert!(matches!(err, CipherError::AuthenticationFailed));
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let fc = random_cipher();
        let envelope = fc.encrypt_field("tamper me").unwrap();
        let mut parts = Envelope::decode(&envelope).unwrap();
        parts.ciphertext[0] ^= 0xFF;
        let err = fc.decrypt_field(&parts.encode()).unwrap_err();
        assert!(matches!(err, CipherError::AuthenticationFailed));
    }

    #[test]
    fn tampered_tag_fails_auth() {
        let fc = random_cipher();
        let envelope = fc.encrypt_field("tamper me").unwrap();
        let mut parts = Envelope::decode(&envelope).unwrap();
        parts.tag[TAG_LEN - 1] ^= 0x01;
        let err = fc.decrypt_field(&parts.encode()).unwrap_err();
        assert!(matches!(err, CipherError::AuthenticationFailed));
    }

    #[test]
    fn tampered_nonce_fails_auth() {
        let fc = random_cipher();
        let envelope = fc.encrypt_field("tamper me").unwrap();
        let mut parts = Envelope::decode(&envelope).unwrap();
        parts.nonce[0] ^= 0x80;
        let err = fc.decrypt_field(&parts.encode()).unwrap_err();
        assert!(matches!(err, CipherError::AuthenticationFailed));
    }

    #[test]
    fn rejects_non_base64_input() {
        let fc = random_cipher();
        let err = fc.decrypt_field("definitely not an envelope").unwrap_err();
        assert!(matches!(err, CipherError::MalformedEnvelope(_)));
    }

    #[test]
    fn rejects_truncated_envelope() {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine as _;

        let fc = random_cipher();
        let short = STANDARD.encode([0u8; 27]);
        let err = fc.decrypt_field(&short).unwrap_err();
        assert!(matches!(err, CipherError::MalformedEnvelope(_)));
    }

    #[test]
    fn invalid_utf8_plaintext_is_rejected() {
        let fc = random_cipher();
        // Authenticates fine, but the payload was never a string.
        let envelope = fc.seal(&[0xFF, 0xFE, 0x80]).unwrap();
        let err = fc.decrypt_field(&envelope).unwrap_err();
        assert!(matches!(err, CipherError::InvalidEncoding));
    }

    #[test]
    fn list_round_trip_is_element_wise() {
        let fc = random_cipher();
        let steps = ["step one".to_string(), "step two".to_string()];
        let envelopes = fc.encrypt_fields(&steps).unwrap();
        assert_eq!(envelopes.len(), 2);
        assert_eq!(fc.decrypt_fields(&envelopes).unwrap(), steps);
    }

    #[test]
    fn equal_list_elements_get_distinct_envelopes() {
        let fc = random_cipher();
        let steps = ["isolate the host", "isolate the host"];
        let envelopes = fc.encrypt_fields(&steps).unwrap();
        assert_ne!(envelopes[0], envelopes[1]);
        assert_eq!(fc.decrypt_fields(&envelopes).unwrap(), steps);
    }

    #[test]
    fn corrupt_list_element_fails_alone() {
        let fc = random_cipher();
        let envelopes = fc
            .encrypt_fields(&["keep me", "break me"])
            .unwrap();
        let mut broken = Envelope::decode(&envelopes[1]).unwrap();
        broken.ciphertext[0] ^= 0xFF;

        assert_eq!(fc.decrypt_field(&envelopes[0]).unwrap(), "keep me");
        assert!(fc.decrypt_field(&broken.encode()).is_err());
    }
}
