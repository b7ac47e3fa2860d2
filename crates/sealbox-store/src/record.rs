//! Message records and identifiers.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Length of a message id in bytes.
pub(crate) const ID_SIZE: usize = 16;

/// Unique message identifier: 16 random bytes, rendered as 32 hex chars.
///
/// Ids are drawn from OS entropy at creation and are immutable. A 128-bit
/// random id is unguessable, but it is NOT a capability guaranteeing
/// single-reader access; the store serializes concurrent retrievals
/// itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId([u8; ID_SIZE]);

impl MessageId {
    /// Draw a fresh random id from OS entropy.
    ///
    /// # Errors
    ///
    /// `EntropyUnavailable` if the OS random source fails.
    pub fn generate() -> Result<Self, StoreError> {
        let mut bytes = [0u8; ID_SIZE];
        getrandom::fill(&mut bytes).map_err(|_| StoreError::EntropyUnavailable)?;

        Ok(Self(bytes))
    }

    /// Wrap existing id bytes.
    pub fn from_bytes(bytes: [u8; ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw id bytes, used as the storage key.
    pub fn as_bytes(&self) -> &[u8; ID_SIZE] {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MessageId({self})")
    }
}

impl std::str::FromStr for MessageId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_SIZE * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StoreError::InvalidId);
        }

        let mut bytes = [0u8; ID_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| StoreError::InvalidId)?;
        }

        Ok(Self(bytes))
    }
}

/// One stored ciphertext and its lifecycle counters.
///
/// The envelope is opaque to the store: it holds the encoded
/// `nonce ‖ tag ‖ ciphertext` bytes and never decrypts them. The id is
/// the storage key, not a record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Encoded envelope bytes, opaque to the store.
    pub envelope: Vec<u8>,
    /// Creation time, milliseconds since the Unix epoch. Store-assigned.
    pub created_at_millis: u64,
    /// End of the validity window, milliseconds since the Unix epoch.
    pub expires_at_millis: u64,
    /// Number of successful retrievals so far. Never exceeds `max_views`.
    pub view_count: u32,
    /// Retrieval quota, at least 1. Caller-supplied at creation.
    pub max_views: u32,
    /// Logical liveness flag. Transitions true to false exactly once.
    pub is_active: bool,
}

/// A record snapshot paired with its optimistic-concurrency version.
///
/// The version increments on every successful update; a stale version on
/// write-back means another caller mutated the record in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned {
    /// Update counter, starting at 0 on insert.
    pub version: u64,
    /// The record as of `version`.
    pub record: MessageRecord,
}
