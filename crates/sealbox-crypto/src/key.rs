//! Symmetric key material.

use zeroize::Zeroize;

use crate::error::CryptoError;

/// Symmetric key size in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// A 256-bit symmetric key.
///
/// Supplied by the caller on every operation and never persisted. Key
/// material is zeroized on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Wrap an existing 32-byte key.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Validate and copy key material of unknown length.
    ///
    /// # Errors
    ///
    /// `InvalidKeyLength` for anything other than 32 bytes. 16- and
    /// 24-byte AES keys are rejected too: the generator only ever
    /// produces 32 bytes, and accepting shorter keys would make the
    /// envelope format ambiguous about which key schedule produced it.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let material: [u8; KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength { got: bytes.len() })?;

        Ok(Self(material))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

// Implement Drop to zeroize key material
impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// Generate a fresh random 256-bit key from OS entropy.
///
/// # Errors
///
/// `EntropyUnavailable` if the OS random source fails. Not retried here:
/// an entropy failure indicates an operational problem that the caller
/// must surface, not paper over.
pub fn generate_key() -> Result<SymmetricKey, CryptoError> {
    let mut bytes = [0u8; KEY_SIZE];
    getrandom::fill(&mut bytes).map_err(|_| CryptoError::EntropyUnavailable)?;

    Ok(SymmetricKey::from_bytes(bytes))
}
