use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMcq")]
pub struct Mcq {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

/// Wire form of [`Mcq`]; `id` wins over `_id` and `correctOption` over
/// `correctAnswer` and `answer`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMcq {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    question: String,
    options: Vec<String>,
    #[serde(default)]
    correct_option: Option<usize>,
    #[serde(default)]
    correct_answer: Option<usize>,
    #[serde(default)]
    answer: Option<usize>,
}

impl TryFrom<RawMcq> for Mcq {
    type Error = String;

    fn try_from(raw: RawMcq) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw
                .id
                .or(raw.object_id)
                .ok_or_else(|| "missing field `id`".to_string())?,
            question: raw.question,
            options: raw.options,
            correct_option: raw
                .correct_option
                .or(raw.correct_answer)
                .or(raw.answer)
                .ok_or_else(|| "missing field `correctOption`".to_string())?,
        })
    }
}

impl Mcq {
    /// At least two options and an answer index that points at one of them.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.options.len() >= 2 && self.correct_option < self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> Option<&str> {
        self.options.get(self.correct_option).map(String::as_str)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum McqListResponse {
    Wrapped { mcqs: Vec<Mcq> },
    Data { data: Vec<Mcq> },
    Bare(Vec<Mcq>),
}

impl McqListResponse {
    pub(crate) fn into_mcqs(self) -> Vec<Mcq> {
        match self {
            Self::Wrapped { mcqs } | Self::Data { data: mcqs } | Self::Bare(mcqs) => mcqs,
        }
    }
}
