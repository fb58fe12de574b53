//! Client helpers for identity endpoints.

use crate::{
    api::{ApiClient, ClientError, Envelope},
    features::auth::types::{MeResponse, User, VerifyRequest},
};

pub const ME_PATH: &str = "user/me";
pub const VERIFY_PATH: &str = "user/verify";

/// Fetch the authenticated user.
///
/// # Errors
/// Returns an error on transport failure, a failed envelope, or an unexpected payload.
pub async fn fetch_me(client: &ApiClient) -> Result<User, ClientError> {
    client
        .get(ME_PATH)
        .await?
        .decode::<MeResponse>(ME_PATH)
        .map(MeResponse::into_user)
}

/// Submit an email verification code. The envelope is returned as-is so callers can
/// show the server's message.
///
/// # Errors
/// Returns an error on transport failure or an undecodable body.
pub async fn verify_email(
    client: &ApiClient,
    email: &str,
    code: &str,
) -> Result<Envelope, ClientError> {
    let request = VerifyRequest {
        email: email.to_string(),
        code: code.to_string(),
    };
    client.post(VERIFY_PATH, &request).await
}
