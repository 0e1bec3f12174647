use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use thiserror::Error;

type Nonce = [u8; 12];

const BLOB_VERSION: u8 = 0x01;

/// Cryptographic errors for the session-state blob cipher
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Hex decode error: {0}")]
    HexDecode(String),
    #[error("Base64 decode error: {0}")]
    Base64Decode(String),
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(String),
}

/// Encrypt a session-state blob using AES256-GCM with versioning.
/// Returns base64-encoded data: `[version_byte][nonce(12)][ciphertext]`
pub fn encrypt_state(plaintext: &str, key_hex: &str) -> Result<String, CryptoError> {
    let cipher = build_cipher(key_hex)?;

    // Fresh random nonce per blob (12 bytes for GCM)
    let mut nonce_bytes: Nonce = [0u8; 12];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt((&nonce_bytes).into(), plaintext.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut blob = Vec::with_capacity(1 + 12 + ciphertext.len());
    blob.push(BLOB_VERSION);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(blob))
}

/// Decrypt a session-state blob produced by [`encrypt_state`].
pub fn decrypt_state(encrypted_b64: &str, key_hex: &str) -> Result<String, CryptoError> {
    let blob = BASE64
        .decode(encrypted_b64.trim())
        .map_err(|e| CryptoError::Base64Decode(e.to_string()))?;

    if blob.len() < 13 {
        return Err(CryptoError::InvalidData(
            "Encrypted blob too short (need at least 1 + 12 bytes for version + nonce)"
                .to_string(),
        ));
    }

    let version = blob[0];
    if version != BLOB_VERSION {
        return Err(CryptoError::InvalidData(format!(
            "Unsupported blob version: {}",
            version
        )));
    }

    let nonce: Nonce = blob[1..13]
        .try_into()
        .map_err(|_| CryptoError::InvalidData("Failed to extract nonce".to_string()))?;
    let ciphertext = &blob[13..];

    let cipher = build_cipher(key_hex)?;
    let plaintext = cipher
        .decrypt((&nonce).into(), ciphertext)
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;

    String::from_utf8(plaintext).map_err(|e| CryptoError::Utf8Error(e.to_string()))
}

fn build_cipher(key_hex: &str) -> Result<Aes256Gcm, CryptoError> {
    let key_bytes = hex::decode(key_hex).map_err(|e| CryptoError::HexDecode(e.to_string()))?;

    if key_bytes.len() != 32 {
        return Err(CryptoError::InvalidKey(
            "Encryption key must be 32 bytes (256 bits)".to_string(),
        ));
    }

    let key: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKey("Key conversion failed".to_string()))?;
    Ok(Aes256Gcm::new(&key.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_encrypt_decrypt() {
        let blob = r#"[{"name":"oauth_token","value":"abc123"}]"#;

        let encrypted = encrypt_state(blob, KEY).expect("Encryption failed");
        let decrypted = decrypt_state(&encrypted, KEY).expect("Decryption failed");

        assert_eq!(blob, decrypted);
    }

    #[test]
    fn test_different_nonces() {
        let blob = "cookie payload";

        let encrypted1 = encrypt_state(blob, KEY).expect("Encryption 1 failed");
        let encrypted2 = encrypt_state(blob, KEY).expect("Encryption 2 failed");

        // Should be different due to random nonce
        assert_ne!(encrypted1, encrypted2);

        // But both should decrypt to same value
        assert_eq!(decrypt_state(&encrypted1, KEY).unwrap(), blob);
        assert_eq!(decrypt_state(&encrypted2, KEY).unwrap(), blob);
    }

    #[test]
    fn test_wrong_key_fails() {
        let other_key = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let encrypted = encrypt_state("payload", KEY).unwrap();
        assert!(decrypt_state(&encrypted, other_key).is_err());
    }

    #[test]
    fn test_short_key_rejected() {
        assert!(encrypt_state("payload", "abcd").is_err());
    }

    #[test]
    fn test_tampered_blob_rejected() {
        let encrypted = encrypt_state("payload", KEY).unwrap();
        let mut bytes = BASE64.decode(&encrypted).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let tampered = BASE64.encode(bytes);
        assert!(decrypt_state(&tampered, KEY).is_err());
    }
}
