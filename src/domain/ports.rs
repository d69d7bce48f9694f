//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the database, the filesystem corpus store, the QA pipeline service).
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use super::auth::{AccessToken, LoginCredentials, TokenClaims};
use super::document::Document;
use super::qa::{IndexBuildRequest, QaQuery, QaResult};
use super::user::{User, UserId, Username};

/// Persistence errors raised by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// A unique constraint (username or email) was violated on insert.
    #[error("user already exists: {constraint}")]
    Duplicate {
        /// Name of the violated constraint.
        constraint: String,
    },
}

impl UserPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique-constraint violations.
    pub fn duplicate(constraint: impl Into<String>) -> Self {
        Self::Duplicate {
            constraint: constraint.into(),
        }
    }
}

/// Persistence errors raised by [`DocumentRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentPersistenceError {
    /// Repository connection could not be established.
    #[error("document repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("document repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// The referenced owner does not exist.
    #[error("document owner {user_id} does not exist")]
    UnknownOwner {
        /// Owner identifier the insert referenced.
        user_id: UserId,
    },
}

impl DocumentPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors raised when issuing or verifying bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signing the claims failed.
    #[error("token could not be issued: {message}")]
    Issue {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// The presented token is malformed, has a bad signature, or expired.
    #[error("token is invalid or expired")]
    Invalid,
}

impl TokenError {
    /// Helper for signing failures.
    pub fn issue(message: impl Into<String>) -> Self {
        Self::Issue {
            message: message.into(),
        }
    }
}

/// Errors raised by password hashing adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// Hashing or parsing the stored hash failed.
    #[error("password hashing failed: {message}")]
    Hash {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl PasswordHashError {
    /// Helper for hash failures.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

/// Errors raised by the on-disk corpus store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusStoreError {
    /// Filesystem operation failed.
    #[error("corpus store io failure: {message}")]
    Io {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Uploaded file name was empty or attempted path traversal.
    #[error("file name {name:?} is not acceptable")]
    InvalidFileName {
        /// The rejected name.
        name: String,
    },
}

impl CorpusStoreError {
    /// Helper for filesystem failures.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Helper for rejected file names.
    pub fn invalid_file_name(name: impl Into<String>) -> Self {
        Self::InvalidFileName { name: name.into() }
    }
}

/// Errors raised by the QA pipeline adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The pipeline service could not be reached.
    #[error("pipeline transport failure: {message}")]
    Transport {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// The pipeline service answered with a non-success status.
    #[error("pipeline returned status {status}")]
    Status {
        /// HTTP status code the service returned.
        status: u16,
    },
    /// The pipeline response body could not be decoded.
    #[error("pipeline response could not be decoded: {message}")]
    Decode {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl PipelineError {
    /// Helper for transport-level failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Persistence port for user aggregates.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user alongside its password hash.
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user together with its stored password hash.
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, UserPersistenceError>;
}

/// Persistence port for user-owned documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document record.
    async fn insert(&self, document: &Document) -> Result<(), DocumentPersistenceError>;

    /// List all documents owned by the given user, newest first.
    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Document>, DocumentPersistenceError>;
}

/// Credential verification port used by the token endpoint.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Authenticate the supplied credentials, returning the matched user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, super::Error>;
}

/// Bearer token issuance and verification port.
pub trait TokenService: Send + Sync {
    /// Issue a signed bearer token for the user.
    fn issue(&self, user: &User) -> Result<AccessToken, TokenError>;

    /// Verify an encoded token and return its claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// Password hashing and verification port.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Verify a plaintext password against a stored hash.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}

/// Filesystem port for each user's uploaded corpus.
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Persist one uploaded file into the user's corpus directory.
    async fn save_file(
        &self,
        user_id: &UserId,
        file_name: &str,
        source: &Path,
    ) -> Result<PathBuf, CorpusStoreError>;

    /// Remove every file in the user's corpus directory, returning how many
    /// entries were deleted.
    async fn clear(&self, user_id: &UserId) -> Result<usize, CorpusStoreError>;

    /// Directory holding the user's uploaded files.
    fn corpus_dir(&self, user_id: &UserId) -> PathBuf;
}

/// Port to the delegated retrieval/reading pipeline service.
#[async_trait]
pub trait QaPipeline: Send + Sync {
    /// Ask the pipeline to (re)build a user's dense index.
    async fn build_index(&self, request: &IndexBuildRequest) -> Result<(), PipelineError>;

    /// Run an extractive query against a user's index.
    async fn run_query(&self, query: &QaQuery) -> Result<QaResult, PipelineError>;
}
