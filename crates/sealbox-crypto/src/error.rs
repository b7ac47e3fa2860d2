//! Error types for key handling and envelope encryption.

use thiserror::Error;

/// Errors from key generation, encryption, and decryption.
///
/// The set is closed and stable: callers match on it to render failures,
/// and no variant is ever retried inside this crate (retrying a failed
/// authentication cannot succeed; retrying a broken entropy source does
/// not make it reliable).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key material is not exactly 32 bytes.
    #[error("invalid key length: expected 32 bytes, got {got}")]
    InvalidKeyLength {
        /// Length of the rejected key material.
        got: usize,
    },

    /// Refused to encrypt a zero-length plaintext.
    #[error("plaintext must not be empty")]
    EmptyPlaintext,

    /// Buffer too short to contain a nonce and an authentication tag.
    #[error("malformed envelope: {len} bytes, need at least 28")]
    MalformedEnvelope {
        /// Length of the rejected buffer.
        len: usize,
    },

    /// Authentication tag mismatch.
    ///
    /// Covers both a wrong key and a tampered or corrupted envelope. The
    /// two causes are indistinguishable on purpose: telling them apart
    /// would hand an attacker a decryption oracle.
    #[error("decryption failed: authentication tag mismatch")]
    AuthenticationFailed,

    /// Decrypted bytes are not valid UTF-8.
    #[error("decrypted plaintext is not valid UTF-8")]
    InvalidEncoding,

    /// OS entropy source failed to supply random bytes.
    #[error("entropy source unavailable")]
    EntropyUnavailable,
}
