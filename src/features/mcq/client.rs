//! Client helpers for chapter MCQs.

use crate::{
    api::{ApiClient, ClientError},
    features::{
        mcq::types::{Mcq, McqListResponse},
        path_segment,
    },
};
use tracing::warn;

/// List the MCQs of a chapter, dropping malformed questions.
///
/// # Errors
/// Returns an error on transport failure, a failed envelope, or an unexpected payload.
pub async fn list_for_chapter(client: &ApiClient, chapter_id: &str) -> Result<Vec<Mcq>, ClientError> {
    let path = format!("mcq/chapter/{}", path_segment(chapter_id)?);

    let mcqs = client
        .get(&path)
        .await?
        .decode::<McqListResponse>(&path)?
        .into_mcqs();

    Ok(mcqs
        .into_iter()
        .filter(|mcq| {
            let valid = mcq.is_valid();
            if !valid {
                warn!("skipping malformed MCQ {}", mcq.id);
            }
            valid
        })
        .collect())
}
