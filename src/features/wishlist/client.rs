//! Client helpers for the learner wishlist.

use crate::{
    api::{ApiClient, ClientError},
    features::{
        path_segment,
        wishlist::types::{AddRequest, WishlistEntry, WishlistResponse},
    },
};

pub const WISHLIST_PATH: &str = "wishlist";

/// List the courses on the current user's wishlist.
///
/// # Errors
/// Returns an error on transport failure, a failed envelope, or an unexpected payload.
pub async fn list(client: &ApiClient) -> Result<Vec<WishlistEntry>, ClientError> {
    client
        .get(WISHLIST_PATH)
        .await?
        .decode::<WishlistResponse>(WISHLIST_PATH)
        .map(WishlistResponse::into_entries)
}

/// # Errors
/// Returns an error on transport failure or a failed envelope.
pub async fn add(client: &ApiClient, course_id: &str) -> Result<(), ClientError> {
    let course_id = path_segment(course_id)?;
    client
        .post(WISHLIST_PATH, &AddRequest { course_id })
        .await?
        .into_result()
        .map(|_| ())
}

/// # Errors
/// Returns an error on transport failure or a failed envelope.
pub async fn remove(client: &ApiClient, course_id: &str) -> Result<(), ClientError> {
    let course_id = path_segment(course_id)?;
    client
        .delete(&format!("{WISHLIST_PATH}/{course_id}"))
        .await?
        .into_result()
        .map(|_| ())
}
