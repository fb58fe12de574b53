//! Profile fields and the locally remembered identity.
//!
//! `save_local` only writes the encrypted store. `save_remote` sends the fields to
//! `PUT user/profile` and mirrors them locally once the server accepted them. Both
//! paths exist because the dashboard screens disagree on where these fields live.

pub mod types;

pub use types::ProfileFields;

use crate::{
    api::{ApiClient, ClientError, Envelope},
    features::auth::User,
    session::{SessionStore, StoreError, keys},
};
use serde_json::Value;
use tracing::debug;

pub const PROFILE_PATH: &str = "user/profile";

/// # Errors
/// Returns an error if the stored values cannot be opened.
pub fn load_local(store: &dyn SessionStore) -> Result<ProfileFields, StoreError> {
    let links = match store.get(keys::LINKS)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(link) => Some(link),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(ProfileFields {
        position: store.get_string(keys::POSITION)?,
        about: store.get_string(keys::ABOUT)?,
        links,
    })
}

/// Writes the fields to the encrypted store only. Unset fields are removed.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn save_local(store: &dyn SessionStore, fields: &ProfileFields) -> Result<(), StoreError> {
    put_optional(store, keys::POSITION, fields.position.as_deref())?;
    put_optional(store, keys::ABOUT, fields.about.as_deref())?;
    store.set(
        keys::LINKS,
        Value::Array(fields.links.iter().cloned().map(Value::String).collect()),
    )
}

/// Sends the fields to the server, then mirrors them locally on success.
///
/// # Errors
/// Returns an error on transport failure or if the local mirror cannot be written.
pub async fn save_remote(api: &ApiClient, fields: &ProfileFields) -> Result<Envelope, ClientError> {
    let envelope = api.put(PROFILE_PATH, fields).await?;

    if envelope.is_success() {
        save_local(api.session().as_ref(), fields)?;
        debug!("profile saved remotely and mirrored locally");
    }

    Ok(envelope)
}

/// Stores the identity fields a screen shows without a round trip.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn remember_identity(store: &dyn SessionStore, user: &User) -> Result<(), StoreError> {
    store.set(keys::USER_ID, Value::String(user.id.clone()))?;
    store.set(keys::NAME, Value::String(user.username.clone()))?;
    store.set(keys::EMAIL, Value::String(user.email.clone()))?;
    store.set(keys::ROLE, Value::String(user.role.to_string()))
}

fn put_optional(store: &dyn SessionStore, key: &str, value: Option<&str>) -> Result<(), StoreError> {
    match value {
        Some(value) => store.set(key, Value::String(value.to_string())),
        None => store.remove(key),
    }
}
