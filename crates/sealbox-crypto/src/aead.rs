//! Authenticated encryption with AES-256-GCM.
//!
//! Encryption draws its own nonce; there is no API for supplying one.
//! Decryption is authenticated decryption, not decrypt-then-verify: the
//! tag is checked by the cipher as part of the same operation, and no
//! plaintext leaves this module on a failed check.

use aes_gcm::{
    Aes256Gcm, Nonce, Tag,
    aead::{AeadInPlace, KeyInit},
};

use crate::{
    envelope::{Envelope, NONCE_SIZE},
    error::CryptoError,
    key::SymmetricKey,
};

/// Encrypt a message under a 256-bit key.
///
/// A fresh random 12-byte nonce is drawn from OS entropy for every call.
/// The tag covers only the ciphertext; no associated data is bound.
///
/// # Errors
///
/// - `EmptyPlaintext`: refusing to seal a zero-length message
/// - `EntropyUnavailable`: the OS random source failed
pub fn encrypt(plaintext: &str, key: &SymmetricKey) -> Result<Envelope, CryptoError> {
    if plaintext.is_empty() {
        return Err(CryptoError::EmptyPlaintext);
    }

    let mut nonce = [0u8; NONCE_SIZE];
    getrandom::fill(&mut nonce).map_err(|_| CryptoError::EntropyUnavailable)?;

    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let mut buffer = plaintext.as_bytes().to_vec();

    let Ok(tag) = cipher.encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut buffer)
    else {
        unreachable!("AES-GCM encryption cannot fail for in-memory plaintext sizes");
    };

    Ok(Envelope { nonce, tag: tag.into(), ciphertext: buffer })
}

/// Decrypt an envelope under a 256-bit key.
///
/// # Errors
///
/// - `AuthenticationFailed`: tag mismatch. Wrong key and tampered
///   ciphertext are reported identically
/// - `InvalidEncoding`: the plaintext authenticated but is not UTF-8
///   (the envelope was produced outside this crate)
pub fn decrypt(envelope: &Envelope, key: &SymmetricKey) -> Result<String, CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let mut buffer = envelope.ciphertext.clone();

    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&envelope.nonce),
            b"",
            &mut buffer,
            Tag::from_slice(&envelope.tag),
        )
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    String::from_utf8(buffer).map_err(|_| CryptoError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{envelope::TAG_SIZE, key::generate_key};

    fn zero_key() -> SymmetricKey {
        SymmetricKey::from_bytes([0u8; 32])
    }

    #[test]
    fn round_trip_recovers_plaintext() {
        let key = generate_key().expect("entropy available");

        let envelope = encrypt("attack at dawn", &key).expect("encrypt");
        let recovered = decrypt(&envelope, &key).expect("decrypt");

        assert_eq!(recovered, "attack at dawn");
    }

    #[test]
    fn hello_under_zero_key_round_trips() {
        let key = zero_key();

        let envelope = encrypt("hello", &key).expect("encrypt");

        assert_eq!(envelope.ciphertext.len(), 5, "GCM ciphertext matches plaintext length");
        assert_eq!(decrypt(&envelope, &key).expect("decrypt"), "hello");
    }

    #[test]
    fn tampering_with_first_envelope_byte_fails_auth() {
        let key = zero_key();
        let envelope = encrypt("hello", &key).expect("encrypt");

        let mut bytes = envelope.encode();
        bytes[0] ^= 0x01;
        let tampered = Envelope::decode(&bytes).expect("still well-formed");

        assert_eq!(decrypt(&tampered, &key), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn wrong_key_fails_auth() {
        let key = generate_key().expect("entropy available");
        let other = generate_key().expect("entropy available");
        let envelope = encrypt("secret", &key).expect("encrypt");

        assert_eq!(decrypt(&envelope, &other), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn nonces_and_ciphertexts_are_unique_per_call() {
        let key = zero_key();

        let first = encrypt("same plaintext", &key).expect("encrypt");
        let second = encrypt("same plaintext", &key).expect("encrypt");

        assert_ne!(first.nonce, second.nonce, "nonce reused across calls");
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn empty_plaintext_is_rejected() {
        assert_eq!(encrypt("", &zero_key()), Err(CryptoError::EmptyPlaintext));
    }

    #[test]
    fn non_utf8_plaintext_reports_invalid_encoding() {
        // Seal raw non-UTF-8 bytes with the cipher directly, as a foreign
        // producer of the envelope format might.
        let key = zero_key();
        let cipher = Aes256Gcm::new(key.as_bytes().into());
        let nonce = [9u8; NONCE_SIZE];
        let mut buffer = vec![0xFF, 0xFE, 0xFD];
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut buffer)
            .expect("encrypt");

        let tag_bytes: [u8; TAG_SIZE] = tag.into();
        let envelope = Envelope { nonce, tag: tag_bytes, ciphertext: buffer };

        assert_eq!(decrypt(&envelope, &key), Err(CryptoError::InvalidEncoding));
    }
}
