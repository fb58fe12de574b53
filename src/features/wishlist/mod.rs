//! Learner wishlist with a local mirror. The mirror only changes after the server
//! accepted the change, so a failed call leaves it as it was.

pub mod client;
pub mod types;

pub use types::WishlistEntry;

use crate::api::{ApiClient, ClientError};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct Wishlist {
    course_ids: BTreeSet<String>,
}

impl Wishlist {
    /// # Errors
    /// Returns an error if the wishlist cannot be fetched.
    pub async fn load(api: &ApiClient) -> Result<Self, ClientError> {
        let entries = client::list(api).await?;
        Ok(Self::from_entries(&entries))
    }

    #[must_use]
    pub fn from_entries(entries: &[WishlistEntry]) -> Self {
        Self {
            course_ids: entries.iter().map(|e| e.course_id.clone()).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, course_id: &str) -> bool {
        self.course_ids.contains(course_id.trim())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.course_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.course_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.course_ids.iter().map(String::as_str)
    }

    /// Adds or removes `course_id` and returns whether it is now on the wishlist.
    ///
    /// # Errors
    /// Returns an error if the server call fails; the mirror is left unchanged.
    pub async fn toggle(&mut self, api: &ApiClient, course_id: &str) -> Result<bool, ClientError> {
        let course_id = course_id.trim();

        if self.contains(course_id) {
            client::remove(api, course_id).await?;
            self.course_ids.remove(course_id);
            debug!("removed {} from wishlist", course_id);
            Ok(false)
        } else {
            client::add(api, course_id).await?;
            self.course_ids.insert(course_id.to_string());
            debug!("added {} to wishlist", course_id);
            Ok(true)
        }
    }
}
