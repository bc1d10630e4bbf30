//! Field-level authenticated encryption for sensitive incident columns.
//!
//! Incident reports carry personal and investigative detail: the free-text
//! description, reporter name and email, location, the AI-generated summary,
//! and the mitigation-step list. Those columns are encrypted with
//! AES-256-GCM before being written to the hosted database and decrypted
//! after reads. The store is treated as an independent, tamperable system
//! (rows can be edited through its own API), so every read is authenticated
//! and fails closed on any modification instead of returning corrupted
//! plaintext silently.
//!
//! Identifiers, enumerated status/type columns, and numeric scores stay in
//! plaintext; which columns exist at all is the persistence layer's concern,
//! not this crate's.
//!
//! # Ciphertext format
//!
//! ```text
//! base64(nonce[12] || tag[16] || ciphertext)
//! ```
//!
//! Standard base64 with padding. There is no version byte, key identifier,
//! or associated data; the format is tied to exactly one key at a time.
//!
//! # Startup sequence
//!
//! 1. Load and validate [`Config`] from environment variables
//!    (`DATA_ENCRYPTION_KEY`, a base64-encoded 32-byte key).
//! 2. Decode the key into a [`FieldKey`]; any failure aborts startup.
//! 3. Build one [`FieldCipher`] and hand it by reference to whatever
//!    component persists incident rows.
//!
//! ```ignore
//! let cipher = FieldCipher::from_env()?;
//! let stored = cipher.encrypt_field("alice@example.com")?;
//! let email = cipher.decrypt_field(&stored)?;
//! ```

pub mod cipher;
pub mod config;
pub mod envelope;
pub mod error;
pub mod key;

pub use cipher::FieldCipher;
pub use config::Config;
pub use envelope::{Envelope, ENVELOPE_OVERHEAD, NONCE_LEN, TAG_LEN};
pub use error::{CipherError, ConfigError};
pub use key::{FieldKey, KEY_LEN};
