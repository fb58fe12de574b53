use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawProgress")]
pub struct CourseProgress {
    pub course_id: String,
    pub completed_lessons: Vec<String>,
    pub total_lessons: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProgress {
    #[serde(default)]
    course_id: Option<String>,
    #[serde(default)]
    course: Option<String>,
    #[serde(default)]
    completed_lessons: Vec<String>,
    #[serde(default)]
    total_lessons: u32,
}

impl TryFrom<RawProgress> for CourseProgress {
    type Error = String;

    fn try_from(raw: RawProgress) -> Result<Self, Self::Error> {
        Ok(Self {
            course_id: raw
                .course_id
                .or(raw.course)
                .ok_or_else(|| "missing field `courseId`".to_string())?,
            completed_lessons: raw.completed_lessons,
            total_lessons: raw.total_lessons,
        })
    }
}

impl CourseProgress {
    #[must_use]
    pub fn empty(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            completed_lessons: Vec::new(),
            total_lessons: 0,
        }
    }

    /// Completion percentage, rounded down. Duplicate lesson ids count once and
    /// the result never exceeds 100.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total_lessons == 0 {
            return 0;
        }

        let done = self
            .completed_lessons
            .iter()
            .collect::<BTreeSet<_>>()
            .len()
            .min(self.total_lessons as usize);

        u8::try_from(done * 100 / self.total_lessons as usize).unwrap_or(100)
    }

    #[must_use]
    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|id| id == lesson_id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ProgressResponse {
    Wrapped { progress: CourseProgress },
    Data { data: CourseProgress },
    Bare(CourseProgress),
}

impl ProgressResponse {
    pub(crate) fn into_progress(self) -> CourseProgress {
        match self {
            Self::Wrapped { progress } | Self::Data { data: progress } | Self::Bare(progress) => {
                progress
            }
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompleteLessonRequest<'a> {
    pub course_id: &'a str,
    pub lesson_id: &'a str,
}
