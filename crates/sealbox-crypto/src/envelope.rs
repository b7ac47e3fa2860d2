//! Wire format for encrypted messages.
//!
//! An envelope is the concatenation `nonce (12) ‖ tag (16) ‖ ciphertext`.
//! No framing, no length prefixes: GCM is a stream mode, so the ciphertext
//! length equals the plaintext length and everything after byte 28 is
//! ciphertext. This layout is wire-compatibility-sensitive and must not
//! change; stored envelopes from earlier deployments decode against it.

use crate::error::CryptoError;

/// AES-GCM nonce size in bytes.
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Smallest well-formed envelope: nonce and tag with empty ciphertext.
pub const MIN_ENVELOPE_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// One encrypted message: nonce, authentication tag, and ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Random per-encryption nonce.
    pub nonce: [u8; NONCE_SIZE],
    /// Authentication tag covering the ciphertext.
    pub tag: [u8; TAG_SIZE],
    /// Ciphertext, same length as the plaintext.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialize to the wire layout `nonce ‖ tag ‖ ciphertext`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MIN_ENVELOPE_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse wire bytes into an envelope.
    ///
    /// # Errors
    ///
    /// `MalformedEnvelope` if the buffer cannot contain a nonce and a tag.
    /// No other validation happens here; a structurally valid envelope
    /// with garbage contents is caught by tag verification in
    /// [`decrypt`](crate::decrypt).
    pub fn decode(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < MIN_ENVELOPE_SIZE {
            return Err(CryptoError::MalformedEnvelope { len: bytes.len() });
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[..NONCE_SIZE]);

        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&bytes[NONCE_SIZE..MIN_ENVELOPE_SIZE]);

        Ok(Self { nonce, tag, ciphertext: bytes[MIN_ENVELOPE_SIZE..].to_vec() })
    }

    /// Total encoded length in bytes.
    pub fn encoded_len(&self) -> usize {
        MIN_ENVELOPE_SIZE + self.ciphertext.len()
    }
}
