use crate::{
    api::{ApiClient, ClientConfig},
    cli::commands::{api, store},
    session::{EncryptedStore, StoreKey},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::warn;

/// Settings shared by every action.
#[derive(Clone)]
pub struct GlobalArgs {
    pub api_base_url: Option<String>,
    pub timeout: Duration,
    pub refresh_path: String,
    pub store_path: PathBuf,
    pub store_key: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api: api::Options, store: store::Options) -> Self {
        Self {
            api_base_url: api.base_url,
            timeout: api.timeout,
            refresh_path: api.refresh_path,
            store_path: store.path,
            store_key: store.key,
        }
    }

    /// # Errors
    /// Returns an error if the configured key is not a base64 32 byte key.
    pub fn store_key(&self) -> Result<StoreKey> {
        match &self.store_key {
            Some(key) => StoreKey::from_base64(key.expose_secret())
                .context("invalid --store-key (COURSEDESK_STORE_KEY)"),
            None => {
                warn!("no store key configured, using the built-in key");
                Ok(StoreKey::builtin())
            }
        }
    }

    /// # Errors
    /// Returns an error if the store key is invalid.
    pub fn open_store(&self) -> Result<Arc<EncryptedStore>> {
        Ok(Arc::new(EncryptedStore::open(
            self.store_path.clone(),
            self.store_key()?,
        )))
    }

    /// Builds an API client on top of the file-backed session store.
    ///
    /// # Errors
    /// Returns an error if the base URL is missing or invalid, or the store key is invalid.
    pub fn client(&self) -> Result<ApiClient> {
        let base_url = self
            .api_base_url
            .clone()
            .context("missing required argument: --api-base-url")?;

        let config = ClientConfig {
            base_url,
            timeout: self.timeout,
            refresh_path: self.refresh_path.clone(),
        };

        ApiClient::new(&config, self.open_store()?).context("failed to build API client")
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .field("refresh_path", &self.refresh_path)
            .field("store_path", &self.store_path)
            .field("store_key", &"***")
            .finish()
    }
}
