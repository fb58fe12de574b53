//! Feature areas built on the API client. Each area keeps its request and
//! response types next to the client helpers so screens and CLI actions only deal
//! with typed values.

pub mod auth;
pub mod mcq;
pub mod profile;
pub mod progress;
pub mod wishlist;

use crate::api::ClientError;

/// Checks that an identifier can be used as a single path segment.
pub(crate) fn path_segment(id: &str) -> Result<&str, ClientError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#', '%']) || id.chars().any(char::is_whitespace) {
        return Err(ClientError::Config(format!("invalid identifier: {id:?}")));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::path_segment;

    #[test]
    fn path_segment_accepts_plain_ids() {
        assert_eq!(path_segment(" 665f1c2ab ").ok(), Some("665f1c2ab"));
        assert_eq!(path_segment("rust-101").ok(), Some("rust-101"));
    }

    #[test]
    fn path_segment_rejects_traversal_and_queries() {
        for bad in ["", "  ", "../user/me", "a/b", "a?x=1", "a#b", "a b", "%2e%2e"] {
            assert!(path_segment(bad).is_err(), "{bad} should be rejected");
        }
    }
}
