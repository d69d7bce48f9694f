//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CorpusStore, DocumentRepository, LoginService, PasswordHasher, QaPipeline, TokenService,
    UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User persistence port.
    pub users: Arc<dyn UserRepository>,
    /// Document persistence port.
    pub documents: Arc<dyn DocumentRepository>,
    /// Credential verification port.
    pub login: Arc<dyn LoginService>,
    /// Bearer token issuance and verification port.
    pub tokens: Arc<dyn TokenService>,
    /// Password hashing port.
    pub hasher: Arc<dyn PasswordHasher>,
    /// Uploaded corpus filesystem port.
    pub corpus: Arc<dyn CorpusStore>,
    /// Delegated QA pipeline port.
    pub pipeline: Arc<dyn QaPipeline>,
}
