use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEntry")]
pub struct WishlistEntry {
    pub course_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Wire form of [`WishlistEntry`]. The entry's own `_id` is ignored; the course
/// comes from `courseId`, or from `course` as an id or a populated document.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(default)]
    course_id: Option<String>,
    #[serde(default)]
    course: Option<CourseRef>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CourseRef {
    Id(String),
    Populated {
        #[serde(default)]
        id: Option<String>,
        #[serde(default, rename = "_id")]
        object_id: Option<String>,
        #[serde(default)]
        title: Option<String>,
    },
}

impl TryFrom<RawEntry> for WishlistEntry {
    type Error = String;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let (course, course_title) = match raw.course {
            Some(CourseRef::Id(id)) => (Some(id), None),
            Some(CourseRef::Populated {
                id,
                object_id,
                title,
            }) => (id.or(object_id), title),
            None => (None, None),
        };

        let course_id = raw
            .course_id
            .or(course)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "missing field `courseId`".to_string())?;

        Ok(Self {
            course_id,
            title: raw.title.or(course_title),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum WishlistResponse {
    Wrapped { wishlist: Vec<WishlistEntry> },
    Data { data: Vec<WishlistEntry> },
    Bare(Vec<WishlistEntry>),
}

impl WishlistResponse {
    pub(crate) fn into_entries(self) -> Vec<WishlistEntry> {
        match self {
            Self::Wrapped { wishlist: entries } | Self::Data { data: entries } | Self::Bare(entries) => {
                entries
            }
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddRequest<'a> {
    pub course_id: &'a str,
}
