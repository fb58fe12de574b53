use super::StoreError;
use base64ct::{Base64, Encoding};
use chacha20poly1305::{
    ChaCha20Poly1305, Key, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use rand::{RngCore, rngs::OsRng};

pub const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

// Used when no key is configured, matching the key the browser dashboard ships with.
const BUILTIN_KEY: &[u8; KEY_LEN] = b"coursedesk-dashboard-session-key";

/// Symmetric key for sealing session values.
#[derive(Clone)]
pub struct StoreKey(Key);

impl StoreKey {
    /// Decodes a base64 key of exactly 32 bytes.
    ///
    /// # Errors
    /// Returns an error if the value is not base64 or has the wrong length.
    pub fn from_base64(encoded: &str) -> Result<Self, StoreError> {
        let bytes = Base64::decode_vec(encoded.trim())
            .map_err(|err| StoreError::InvalidKey(format!("not base64: {err}")))?;

        if bytes.len() != KEY_LEN {
            return Err(StoreError::InvalidKey(format!(
                "expected {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self(Key::clone_from_slice(&bytes)))
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self(Key::clone_from_slice(BUILTIN_KEY))
    }

    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(Key::clone_from_slice(&bytes))
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        Base64::encode_string(self.0.as_slice())
    }
}

impl std::fmt::Debug for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StoreKey(***)")
    }
}

/// Seals `plaintext` under `name` and returns base64 of `nonce (12 bytes) || ciphertext`.
///
/// # Errors
/// Returns an error if encryption fails.
#[allow(deprecated)]
pub fn seal(key: &StoreKey, name: &str, plaintext: &[u8]) -> Result<String, StoreError> {
    let cipher = ChaCha20Poly1305::new(&key.0);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let payload = Payload {
        msg: plaintext,
        aad: name.as_bytes(),
    };

    let ciphertext = cipher
        .encrypt(nonce, payload)
        .map_err(|_| StoreError::Encrypt(name.to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);

    Ok(Base64::encode_string(&sealed))
}

/// Opens a value produced by [`seal`] for the same `name`.
///
/// # Errors
/// Returns an error if the value is malformed, was sealed under another name or
/// key, or was tampered with.
#[allow(deprecated)]
pub fn open(key: &StoreKey, name: &str, sealed: &str) -> Result<Vec<u8>, StoreError> {
    let data = Base64::decode_vec(sealed).map_err(|_| StoreError::Decrypt(name.to_string()))?;

    if data.len() < NONCE_LEN {
        return Err(StoreError::Decrypt(name.to_string()));
    }

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    let cipher = ChaCha20Poly1305::new(&key.0);

    let payload = Payload {
        msg: ciphertext,
        aad: name.as_bytes(),
    };

    cipher
        .decrypt(nonce, payload)
        .map_err(|_| StoreError::Decrypt(name.to_string()))
}
