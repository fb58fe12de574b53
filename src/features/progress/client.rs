//! Client helpers for course progress.

use crate::{
    api::{ApiClient, ClientError},
    features::{
        path_segment,
        progress::types::{CompleteLessonRequest, CourseProgress, ProgressResponse},
    },
};

pub const PROGRESS_PATH: &str = "progress";

/// Fetch progress for one course. A `404` means the learner has not started it.
///
/// # Errors
/// Returns an error on transport failure, another failed envelope, or an unexpected
/// payload.
pub async fn fetch(client: &ApiClient, course_id: &str) -> Result<CourseProgress, ClientError> {
    let course_id = path_segment(course_id)?;
    let path = format!("{PROGRESS_PATH}/{course_id}");
    let envelope = client.get(&path).await?;

    if envelope.status() == 404 {
        return Ok(CourseProgress::empty(course_id));
    }

    envelope
        .decode::<ProgressResponse>(&path)
        .map(ProgressResponse::into_progress)
}

/// # Errors
/// Returns an error on transport failure or a failed envelope.
pub async fn complete_lesson(
    client: &ApiClient,
    course_id: &str,
    lesson_id: &str,
) -> Result<(), ClientError> {
    let request = CompleteLessonRequest {
        course_id: path_segment(course_id)?,
        lesson_id: path_segment(lesson_id)?,
    };
    client
        .post(PROGRESS_PATH, &request)
        .await?
        .into_result()
        .map(|_| ())
}
