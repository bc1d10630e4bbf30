//! The ciphertext envelope: `base64(nonce || tag || ciphertext)`.
//!
//! ## Decoded layout
//!
//! ```text
//! ┌───────────┬───────────┬──────────────────────────┐
//! │   Nonce   │    Tag    │        Ciphertext        │
//! │ 12 bytes  │ 16 bytes  │  N bytes (N = plaintext) │
//! └───────────┴───────────┴──────────────────────────┘
//! ```
//!
//! The envelope carries no magic bytes, version tag, key identifier, or
//! associated data; it is tied to exactly one key at a time, and every
//! stored field is one independent envelope. Encoding is standard base64
//! (RFC 4648) with padding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CipherError;

/// Size of the nonce (IV) for AES-GCM.
pub const NONCE_LEN: usize = 12;

/// Size of the authentication tag for AES-GCM.
pub const TAG_LEN: usize = 16;

/// Minimum decoded envelope size: nonce + tag around an empty ciphertext.
pub const ENVELOPE_OVERHEAD: usize = NONCE_LEN + TAG_LEN;

/// A decoded envelope, split into its three segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Nonce bytes, unique per encryption call.
    pub nonce: [u8; NONCE_LEN],
    /// GCM authentication tag over the ciphertext.
    pub tag: [u8; TAG_LEN],
    /// Encrypted bytes, one per plaintext byte.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encode to the canonical base64 string representation.
    pub fn encode(&self) -> String {
        let mut raw = Vec::with_capacity(ENVELOPE_OVERHEAD + self.ciphertext.len());
        raw.extend_from_slice(&self.nonce);
        raw.extend_from_slice(&self.tag);
        raw.extend_from_slice(&self.ciphertext);
        STANDARD.encode(raw)
    }

    /// Decode a base64 envelope string and split it into segments.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedEnvelope`] if the input is not valid
    /// standard base64 or decodes to fewer than [`ENVELOPE_OVERHEAD`] bytes.
    pub fn decode(encoded: &str) -> Result<Self, CipherError> {
        let raw = STANDARD
            .decode(encoded)
            .map_err(|_| CipherError::MalformedEnvelope("invalid base64"))?;

        if raw.len() < ENVELOPE_OVERHEAD {
            return Err(CipherError::MalformedEnvelope("decoded payload too short"));
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&raw[..NONCE_LEN]);

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&raw[NONCE_LEN..ENVELOPE_OVERHEAD]);

        Ok(Self {
            nonce,
            tag,
            ciphertext: raw[ENVELOPE_OVERHEAD..].to_vec(),
        })
    }
}
