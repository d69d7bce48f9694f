//! Query and answer types for the delegated extractive QA pipeline.
//!
//! The pipeline itself (dense retrieval, extractive reading, the vector
//! index) lives behind the [`crate::domain::ports::QaPipeline`] port; these
//! types describe what the backend sends it and what comes back.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Default passage split length (in words) for index builds.
pub const DEFAULT_SPLIT_LENGTH: u32 = 1000;
/// Smallest accepted split length.
pub const SPLIT_LENGTH_MIN: u32 = 50;
/// Largest accepted split length.
pub const SPLIT_LENGTH_MAX: u32 = 10_000;
/// Largest accepted top-k value for either pipeline stage.
pub const TOP_K_MAX: u32 = 100;

/// Validation errors for query and index-build parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QaValidationError {
    /// Question was blank once trimmed.
    EmptyQuestion,
    /// Split length fell outside the accepted range.
    SplitLengthOutOfRange {
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },
    /// A top-k value was zero or above [`TOP_K_MAX`].
    TopKOutOfRange {
        /// Largest accepted value.
        max: u32,
    },
}

impl fmt::Display for QaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyQuestion => write!(f, "question must not be empty"),
            Self::SplitLengthOutOfRange { min, max } => {
                write!(f, "split length must be between {min} and {max}")
            }
            Self::TopKOutOfRange { max } => {
                write!(f, "top-k values must be between 1 and {max}")
            }
        }
    }
}

impl std::error::Error for QaValidationError {}

/// Word count per passage used when splitting documents for indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SplitLength(u32);

impl SplitLength {
    /// Validate and construct a [`SplitLength`].
    pub fn new(value: u32) -> Result<Self, QaValidationError> {
        if !(SPLIT_LENGTH_MIN..=SPLIT_LENGTH_MAX).contains(&value) {
            return Err(QaValidationError::SplitLengthOutOfRange {
                min: SPLIT_LENGTH_MIN,
                max: SPLIT_LENGTH_MAX,
            });
        }
        Ok(Self(value))
    }

    /// Raw word count.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for SplitLength {
    fn default() -> Self {
        Self(DEFAULT_SPLIT_LENGTH)
    }
}

/// Result count requested from a pipeline stage (retriever or reader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TopK(u32);

impl TopK {
    /// Validate and construct a [`TopK`].
    pub fn new(value: u32) -> Result<Self, QaValidationError> {
        if value == 0 || value > TOP_K_MAX {
            return Err(QaValidationError::TopKOutOfRange { max: TOP_K_MAX });
        }
        Ok(Self(value))
    }

    /// Raw count.
    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Non-empty natural-language question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Question(String);

impl Question {
    /// Validate and construct a [`Question`]; the input is trimmed first.
    pub fn new(question: impl Into<String>) -> Result<Self, QaValidationError> {
        let trimmed = question.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(QaValidationError::EmptyQuestion);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the question text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Question> for String {
    fn from(value: Question) -> Self {
        value.0
    }
}

impl TryFrom<String> for Question {
    type Error = QaValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Parameters for one extractive QA run against a user's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaQuery {
    /// Owner of the index being queried.
    pub user_id: UserId,
    /// The question to answer.
    pub question: Question,
    /// Passages requested from the retriever.
    pub retriever_top_k: TopK,
    /// Answers requested from the reader.
    pub reader_top_k: TopK,
}

/// Request to (re)build a user's dense index from their uploaded corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBuildRequest {
    /// Owner of the corpus.
    pub user_id: UserId,
    /// Directory containing the uploaded files to index.
    pub corpus_dir: PathBuf,
    /// Passage split length for preprocessing.
    pub split_length: SplitLength,
}

/// Character offsets of an answer span within its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSpan {
    /// Inclusive start offset.
    pub start: u64,
    /// Exclusive end offset.
    pub end: u64,
}

/// One ranked answer extracted by the reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// The extracted answer text.
    pub answer: String,
    /// Reader confidence in `[0, 1]`.
    pub score: f32,
    /// Surrounding passage text, when the pipeline provides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Pipeline-side identifier of the source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Offsets of the span within the source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<AnswerSpan>,
}

/// Full result of a pipeline query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QaResult {
    /// The question as the pipeline received it.
    pub query: String,
    /// Ranked answers, best first.
    pub answers: Vec<Answer>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(TOP_K_MAX + 1)]
    fn top_k_rejects_out_of_range(#[case] value: u32) {
        assert_eq!(
            TopK::new(value).expect_err("out of range"),
            QaValidationError::TopKOutOfRange { max: TOP_K_MAX }
        );
    }

    #[rstest]
    #[case(SPLIT_LENGTH_MIN - 1)]
    #[case(SPLIT_LENGTH_MAX + 1)]
    fn split_length_rejects_out_of_range(#[case] value: u32) {
        assert_eq!(
            SplitLength::new(value).expect_err("out of range"),
            QaValidationError::SplitLengthOutOfRange {
                min: SPLIT_LENGTH_MIN,
                max: SPLIT_LENGTH_MAX,
            }
        );
    }

    #[rstest]
    fn split_length_defaults_to_original_value() {
        assert_eq!(SplitLength::default().get(), 1000);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_questions_are_rejected(#[case] input: &str) {
        assert_eq!(
            Question::new(input).expect_err("blank question"),
            QaValidationError::EmptyQuestion
        );
    }

    #[rstest]
    fn answers_serialise_camel_case() {
        let answer = Answer {
            answer: "LSH".to_owned(),
            score: 0.92,
            context: Some("…locality sensitive hashing…".to_owned()),
            document_id: Some("doc-1".to_owned()),
            span: Some(AnswerSpan { start: 10, end: 13 }),
        };
        let value = serde_json::to_value(&answer).expect("answer serialises");
        assert_eq!(value["documentId"], "doc-1");
        assert_eq!(value["span"]["start"], 10);
    }
}
