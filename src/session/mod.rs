//! Client-held session state. Tokens and local profile fields are kept in an
//! encrypted key/value store that the API client and the route gate receive by
//! injection instead of reaching for ambient storage.

pub mod crypto;
pub mod store;

pub use crypto::StoreKey;
pub use store::EncryptedStore;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Key names used in the session store.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const ROLE: &str = "role";
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const USER_ID: &str = "userId";
    pub const POSITION: &str = "position";
    pub const ABOUT: &str = "about";
    pub const LINKS: &str = "links";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store key: {0}")]
    InvalidKey(String),
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session store is corrupt: {0}")]
    Corrupt(String),
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to seal value for {0}")]
    Encrypt(String),
    #[error("failed to open value for {0}")]
    Decrypt(String),
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Key/value storage for the client session. Values are JSON; backings decide how
/// they are protected at rest.
pub trait SessionStore: Send + Sync {
    /// Load persisted state. Called by the gate before any read.
    ///
    /// # Errors
    /// Returns an error if the backing cannot be read or decoded.
    fn hydrate(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// # Errors
    /// Returns an error if the stored value cannot be opened or decoded.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// # Errors
    /// Returns an error if the value cannot be sealed or persisted.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// # Errors
    /// Returns an error if the store cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// # Errors
    /// Returns an error if the store cannot be persisted.
    fn clear(&self) -> Result<(), StoreError>;

    /// Reads a string value, ignoring values of any other JSON type.
    ///
    /// # Errors
    /// Returns an error if the stored value cannot be opened.
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key)?.and_then(|value| match value {
            Value::String(text) => Some(text),
            _ => None,
        }))
    }

    /// # Errors
    /// Returns an error if the stored token cannot be opened.
    fn get_token(&self) -> Result<Option<SecretString>, StoreError> {
        Ok(self
            .get_string(keys::TOKEN)?
            .filter(|token| !token.is_empty())
            .map(SecretString::from))
    }

    /// # Errors
    /// Returns an error if the token cannot be persisted.
    fn set_token(&self, token: &SecretString) -> Result<(), StoreError> {
        self.set(keys::TOKEN, Value::String(token.expose_secret().to_string()))
    }

    /// Drops both session tokens.
    ///
    /// # Errors
    /// Returns an error if the store cannot be persisted.
    fn clear_token(&self) -> Result<(), StoreError> {
        self.remove(keys::TOKEN)?;
        self.remove(keys::REFRESH_TOKEN)
    }

    /// # Errors
    /// Returns an error if the stored token cannot be opened.
    fn get_refresh_token(&self) -> Result<Option<SecretString>, StoreError> {
        Ok(self
            .get_string(keys::REFRESH_TOKEN)?
            .filter(|token| !token.is_empty())
            .map(SecretString::from))
    }

    /// # Errors
    /// Returns an error if the token cannot be persisted.
    fn set_refresh_token(&self, token: &SecretString) -> Result<(), StoreError> {
        self.set(
            keys::REFRESH_TOKEN,
            Value::String(token.expose_secret().to_string()),
        )
    }

    /// Stores a full session, replacing the refresh token only when one is given.
    ///
    /// # Errors
    /// Returns an error if either token cannot be persisted.
    fn set_session(
        &self,
        access: &SecretString,
        refresh: Option<&SecretString>,
    ) -> Result<(), StoreError> {
        self.set_token(access)?;
        if let Some(refresh) = refresh {
            self.set_refresh_token(refresh)?;
        }
        Ok(())
    }
}
