//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! adapter layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.

pub mod auth;
pub mod document;
pub mod error;
pub mod ports;
pub mod qa;
pub mod user;

pub use self::auth::{AccessToken, LoginCredentials, LoginValidationError, TokenClaims};
pub use self::document::{Document, DocumentId, DocumentValidationError, Title};
pub use self::error::{EmptyMessageError, Error, ErrorCode};
pub use self::qa::{
    Answer, AnswerSpan, IndexBuildRequest, QaQuery, QaResult, QaValidationError, Question,
    SplitLength, TopK,
};
pub use self::user::{
    EmailAddress, User, UserId, UserValidationError, Username, validate_full_name,
};
