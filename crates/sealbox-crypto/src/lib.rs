//! Sealbox Cryptographic Primitives
//!
//! Authenticated encryption for ephemeral messages. Each message is sealed
//! under a caller-supplied 256-bit key with AES-256-GCM and carried in a
//! self-contained binary envelope:
//!
//! ```text
//! Plaintext
//!     │
//!     ▼
//! AES-256-GCM (fresh random 12-byte nonce per call)
//!     │
//!     ▼
//! Envelope = nonce (12) ‖ tag (16) ‖ ciphertext
//! ```
//!
//! # Security
//!
//! Confidentiality and integrity:
//! - GCM fuses encryption and authentication into one primitive with one
//!   failure mode, so there is no decrypt-then-verify window and no
//!   tag-stripping surface
//! - A tag mismatch reports [`CryptoError::AuthenticationFailed`] whether
//!   the key was wrong or the envelope was tampered with; callers cannot
//!   tell the two apart
//!
//! Nonce discipline:
//! - Every encryption draws an independent random nonce from OS entropy;
//!   nonces are never derived from a counter
//! - Nonce reuse under the same key is the catastrophic failure mode of
//!   GCM, which is why no API in this crate accepts a caller nonce
//!
//! Key handling:
//! - Keys are exactly 32 bytes. The cipher family also supports 16- and
//!   24-byte keys; those are rejected so every envelope in the system is
//!   produced by the same 256-bit key schedule
//! - [`SymmetricKey`] zeroizes its material on drop and is never persisted
//!   by any Sealbox component

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod aead;
mod envelope;
mod error;
mod key;

pub use aead::{decrypt, encrypt};
pub use envelope::{Envelope, MIN_ENVELOPE_SIZE, NONCE_SIZE, TAG_SIZE};
pub use error::CryptoError;
pub use key::{KEY_SIZE, SymmetricKey, generate_key};
