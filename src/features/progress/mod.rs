//! Course progress with a local mirror that follows successful server updates.

pub mod client;
pub mod types;

pub use types::CourseProgress;

use crate::api::{ApiClient, ClientError};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct ProgressTracker {
    progress: CourseProgress,
}

impl ProgressTracker {
    /// # Errors
    /// Returns an error if progress cannot be fetched.
    pub async fn load(api: &ApiClient, course_id: &str) -> Result<Self, ClientError> {
        client::fetch(api, course_id).await.map(Self::from_progress)
    }

    #[must_use]
    pub fn from_progress(progress: CourseProgress) -> Self {
        Self { progress }
    }

    #[must_use]
    pub fn progress(&self) -> &CourseProgress {
        &self.progress
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        self.progress.percent()
    }

    /// Marks a lesson complete. Returns `false` without calling the server when the
    /// lesson is already complete.
    ///
    /// # Errors
    /// Returns an error if the server call fails; the mirror is left unchanged.
    pub async fn complete_lesson(
        &mut self,
        api: &ApiClient,
        lesson_id: &str,
    ) -> Result<bool, ClientError> {
        let lesson_id = lesson_id.trim();
        if self.progress.is_completed(lesson_id) {
            return Ok(false);
        }

        client::complete_lesson(api, &self.progress.course_id, lesson_id).await?;
        self.progress.completed_lessons.push(lesson_id.to_string());

        debug!(
            "lesson {} complete, course {} at {}%",
            lesson_id,
            self.progress.course_id,
            self.progress.percent()
        );

        Ok(true)
    }
}
