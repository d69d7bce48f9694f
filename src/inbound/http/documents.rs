//! Document CRUD handlers.
//!
//! Documents are stored structured content, separate from the raw files a
//! user uploads for indexing.

use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::DocumentPersistenceError;
use crate::domain::{Document, DocumentId, DocumentValidationError, Error, Title, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::map_user_persistence_error;

/// Query parameters for `POST /documents/`.
#[derive(Debug, Deserialize)]
pub struct DocumentOwner {
    /// Identifier of the owning user.
    pub user_id: Uuid,
}

/// Request body for `POST /documents/`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateDocumentRequest {
    /// Document title.
    pub title: String,
    /// Full document text.
    pub content: String,
}

fn map_document_validation_error(err: DocumentValidationError) -> Error {
    let field = match err {
        DocumentValidationError::InvalidId => "id",
        DocumentValidationError::EmptyContent => "content",
        _ => "title",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_document_persistence_error(err: DocumentPersistenceError) -> Error {
    match err {
        DocumentPersistenceError::UnknownOwner { .. } => Error::not_found("User not found"),
        DocumentPersistenceError::Connection { .. } => {
            Error::service_unavailable("document storage is unavailable")
        }
        DocumentPersistenceError::Query { message } => {
            Error::internal(format!("document query failed: {message}"))
        }
    }
}

async fn require_owner(state: &HttpState, owner_id: &UserId) -> Result<(), Error> {
    state
        .users
        .find_by_id(owner_id)
        .await
        .map_err(map_user_persistence_error)?
        .map(|_| ())
        .ok_or_else(|| Error::not_found("User not found"))
}

/// Store a new document for a user.
#[utoipa::path(
    post,
    path = "/documents/",
    params(("user_id" = Uuid, Query, description = "Owner identifier")),
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = Document),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Owner does not exist", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["documents"],
    operation_id = "createDocument",
    security([])
)]
#[post("/documents/")]
pub async fn create_document(
    state: web::Data<HttpState>,
    owner: web::Query<DocumentOwner>,
    payload: web::Json<CreateDocumentRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let owner_id = UserId::from_uuid(owner.user_id);
    require_owner(&state, &owner_id).await?;

    let title = Title::new(payload.title).map_err(map_document_validation_error)?;
    let document = Document::new(
        DocumentId::random(),
        owner_id,
        title,
        payload.content,
        Utc::now(),
    )
    .map_err(map_document_validation_error)?;

    state
        .documents
        .insert(&document)
        .await
        .map_err(map_document_persistence_error)?;
    Ok(HttpResponse::Created().json(document))
}

/// List a user's documents, newest first.
#[utoipa::path(
    get,
    path = "/documents/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owner identifier")),
    responses(
        (status = 200, description = "Documents owned by the user", body = [Document]),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["documents"],
    operation_id = "listDocuments",
    security([])
)]
#[get("/documents/{user_id}")]
pub async fn list_documents(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<Document>>> {
    let owner_id = UserId::from_uuid(path.into_inner());
    require_owner(&state, &owner_id).await?;
    let documents = state
        .documents
        .list_by_owner(&owner_id)
        .await
        .map_err(map_document_persistence_error)?;
    Ok(web::Json(documents))
}
