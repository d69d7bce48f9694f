//! Document data model.
//!
//! Documents are the user-owned text records stored in PostgreSQL. They are
//! distinct from uploaded corpus files: a document is structured content with
//! a title, while corpus files are raw inputs for the index build.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Maximum allowed length for a document title.
pub const TITLE_MAX: usize = 256;

/// Validation errors returned by the document constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// Identifier was empty or not a valid UUID.
    InvalidId,
    /// Title was blank once trimmed.
    EmptyTitle,
    /// Title longer than [`TITLE_MAX`].
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Content was empty.
    EmptyContent,
}

impl fmt::Display for DocumentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "document id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
        }
    }
}

impl std::error::Error for DocumentValidationError {}

/// Stable document identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Validate and construct a [`DocumentId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DocumentValidationError> {
        let parsed =
            Uuid::parse_str(id.as_ref()).map_err(|_| DocumentValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated document title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`]; the input is trimmed first.
    pub fn new(title: impl Into<String>) -> Result<Self, DocumentValidationError> {
        let trimmed = title.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(DocumentValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(DocumentValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed))
    }

    /// Borrow the title as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl TryFrom<String> for Title {
    type Error = DocumentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A user-owned document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    id: DocumentId,
    owner_id: UserId,
    title: Title,
    content: String,
    created_at: DateTime<Utc>,
}

impl Document {
    /// Build a [`Document`] from validated components.
    pub fn new(
        id: DocumentId,
        owner_id: UserId,
        title: Title,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DocumentValidationError> {
        if content.is_empty() {
            return Err(DocumentValidationError::EmptyContent);
        }
        Ok(Self {
            id,
            owner_id,
            title,
            content,
            created_at,
        })
    }

    /// Stable document identifier.
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Owning user.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Document title.
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// Full document text.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Record creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn document(title: &str, content: &str) -> Result<Document, DocumentValidationError> {
        Document::new(
            DocumentId::random(),
            UserId::random(),
            Title::new(title)?,
            content.to_owned(),
            Utc::now(),
        )
    }

    #[rstest]
    #[case("", DocumentValidationError::EmptyTitle)]
    #[case("  ", DocumentValidationError::EmptyTitle)]
    fn blank_titles_are_rejected(#[case] title: &str, #[case] expected: DocumentValidationError) {
        assert_eq!(Title::new(title).expect_err("blank title"), expected);
    }

    #[rstest]
    fn oversized_title_is_rejected() {
        let err = Title::new("t".repeat(TITLE_MAX + 1)).expect_err("too long");
        assert_eq!(err, DocumentValidationError::TitleTooLong { max: TITLE_MAX });
    }

    #[rstest]
    fn empty_content_is_rejected() {
        assert_eq!(
            document("notes", "").expect_err("empty content"),
            DocumentValidationError::EmptyContent
        );
    }

    #[rstest]
    fn document_serialises_camel_case() {
        let doc = document("My Notes", "hello world").expect("valid document");
        let value = serde_json::to_value(&doc).expect("document serialises");
        assert_eq!(value["title"], "My Notes");
        assert!(value.get("ownerId").is_some());
        assert!(value.get("owner_id").is_none());
    }
}
