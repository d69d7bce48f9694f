//! Corpus file management and index-build handlers.
//!
//! These endpoints operate on the raw files a user uploads for indexing:
//! upload, bulk delete, and triggering a rebuild of the user's document
//! store in the delegated pipeline.

use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{CorpusStoreError, PipelineError};
use crate::domain::{Error, IndexBuildRequest, QaValidationError, SplitLength, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::BearerClaims;
use crate::inbound::http::state::HttpState;

/// Query parameters scoping a request to one user.
#[derive(Debug, Deserialize)]
pub struct UserScope {
    /// Identifier of the user whose corpus is addressed.
    pub userid: Uuid,
}

/// Query parameters for `GET /loadingdocstores`.
#[derive(Debug, Deserialize)]
pub struct LoadDocStoreParams {
    /// Identifier of the user whose corpus is addressed.
    pub userid: Uuid,
    /// Passage split length used while preprocessing; defaults to 1000.
    pub split_length: Option<u32>,
}

/// Multipart body for `POST /uploadfiles`.
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    /// The uploaded corpus file.
    pub file: TempFile,
}

pub(crate) fn map_corpus_error(err: CorpusStoreError) -> Error {
    match err {
        CorpusStoreError::InvalidFileName { name } => {
            Error::invalid_request(format!("file name {name:?} is not acceptable"))
        }
        CorpusStoreError::Io { message } => {
            Error::internal(format!("corpus store failure: {message}"))
        }
    }
}

pub(crate) fn map_pipeline_error(err: PipelineError) -> Error {
    match err {
        PipelineError::Transport { .. } => Error::service_unavailable("QA pipeline is unreachable"),
        PipelineError::Status { status } => {
            Error::internal(format!("QA pipeline returned status {status}"))
        }
        PipelineError::Decode { message } => {
            Error::internal(format!("QA pipeline response was malformed: {message}"))
        }
    }
}

fn map_split_length_error(err: QaValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "split_length" }))
}

/// Upload one corpus file into the user's corpus directory.
#[utoipa::path(
    post,
    path = "/uploadfiles",
    params(("userid" = Uuid, Query, description = "Owner of the corpus")),
    responses(
        (status = 200, description = "File stored"),
        (status = 400, description = "Missing or invalid file name", body = Error),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 403, description = "Token belongs to a different user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["corpus"],
    operation_id = "uploadFile"
)]
#[post("/uploadfiles")]
pub async fn upload_file(
    state: web::Data<HttpState>,
    claims: BearerClaims,
    scope: web::Query<UserScope>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> ApiResult<HttpResponse> {
    let user_id = UserId::from_uuid(scope.userid);
    claims.require_user(&user_id)?;

    let file_name = form
        .file
        .file_name
        .clone()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::invalid_request("uploaded file must carry a file name"))?;
    state
        .corpus
        .save_file(&user_id, &file_name, form.file.file.path())
        .await
        .map_err(map_corpus_error)?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "File uploaded successfully",
        "filename": file_name,
    })))
}

/// Delete every file in the user's corpus directory.
#[utoipa::path(
    get,
    path = "/deletefiles",
    params(("userid" = Uuid, Query, description = "Owner of the corpus")),
    responses(
        (status = 200, description = "Files deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 403, description = "Token belongs to a different user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["corpus"],
    operation_id = "deleteFiles"
)]
#[get("/deletefiles")]
pub async fn delete_files(
    state: web::Data<HttpState>,
    claims: BearerClaims,
    scope: web::Query<UserScope>,
) -> ApiResult<HttpResponse> {
    let user_id = UserId::from_uuid(scope.userid);
    claims.require_user(&user_id)?;
    let removed = state
        .corpus
        .clear(&user_id)
        .await
        .map_err(map_corpus_error)?;
    tracing::info!(user_id = %user_id, removed, "cleared corpus directory");
    Ok(HttpResponse::Ok().json(json!({ "status": "Files deleted" })))
}

/// Rebuild the user's document store from their uploaded corpus.
#[utoipa::path(
    get,
    path = "/loadingdocstores",
    params(
        ("userid" = Uuid, Query, description = "Owner of the corpus"),
        ("split_length" = Option<u32>, Query, description = "Passage split length, defaults to 1000")
    ),
    responses(
        (status = 200, description = "Document store loaded"),
        (status = 400, description = "Invalid split length", body = Error),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 403, description = "Token belongs to a different user", body = Error),
        (status = 503, description = "Pipeline unreachable", body = Error)
    ),
    tags = ["corpus"],
    operation_id = "loadDocStore"
)]
#[get("/loadingdocstores")]
pub async fn load_doc_store(
    state: web::Data<HttpState>,
    claims: BearerClaims,
    params: web::Query<LoadDocStoreParams>,
) -> ApiResult<HttpResponse> {
    let user_id = UserId::from_uuid(params.userid);
    claims.require_user(&user_id)?;
    let split_length = match params.split_length {
        Some(value) => SplitLength::new(value).map_err(map_split_length_error)?,
        None => SplitLength::default(),
    };
    let request = IndexBuildRequest {
        user_id,
        corpus_dir: state.corpus.corpus_dir(&user_id),
        split_length,
    };
    state
        .pipeline
        .build_index(&request)
        .await
        .map_err(map_pipeline_error)?;
    Ok(HttpResponse::Ok().json(json!({ "status": "Document store loaded" })))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::{bearer_for, stub_state, test_user};

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .service(upload_file)
            .service(delete_files)
            .service(load_doc_store)
    }

    fn multipart_body(boundary: &str, file_name: &str, content: &str) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        body
    }

    #[actix_web::test]
    async fn upload_requires_bearer_token() {
        let app = actix_test::init_service(test_app(stub_state())).await;
        let request = actix_test::TestRequest::post()
            .uri(&format!("/uploadfiles?userid={}", UserId::random()))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn upload_for_other_user_is_forbidden() {
        let state = stub_state();
        let owner = test_user("ada");
        let token = bearer_for(&state, &owner);
        let app = actix_test::init_service(test_app(state)).await;

        let boundary = "test-boundary";
        let request = actix_test::TestRequest::post()
            .uri(&format!("/uploadfiles?userid={}", UserId::random()))
            .insert_header(("authorization", format!("Bearer {token}")))
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(multipart_body(boundary, "paper.pdf", "pdf bytes"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn upload_stores_the_file_and_reports_its_name() {
        let state = stub_state();
        let owner = test_user("ada");
        let token = bearer_for(&state, &owner);
        let app = actix_test::init_service(test_app(state.clone())).await;

        let boundary = "test-boundary";
        let request = actix_test::TestRequest::post()
            .uri(&format!("/uploadfiles?userid={}", owner.id()))
            .insert_header(("authorization", format!("Bearer {token}")))
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(multipart_body(boundary, "paper.txt", "dense retrieval"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert!(response.status().is_success());
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["status"], "File uploaded successfully");
        assert_eq!(value["filename"], "paper.txt");
    }

    #[actix_web::test]
    async fn delete_files_reports_status() {
        let state = stub_state();
        let owner = test_user("ada");
        let token = bearer_for(&state, &owner);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/deletefiles?userid={}", owner.id()))
            .insert_header(("authorization", format!("Bearer {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert!(response.status().is_success());
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["status"], "Files deleted");
    }

    #[actix_web::test]
    async fn load_doc_store_uses_default_split_length() {
        let state = stub_state();
        let owner = test_user("ada");
        let token = bearer_for(&state, &owner);
        let app = actix_test::init_service(test_app(state.clone())).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/loadingdocstores?userid={}", owner.id()))
            .insert_header(("authorization", format!("Bearer {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert!(response.status().is_success());
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["status"], "Document store loaded");
    }

    #[actix_web::test]
    async fn load_doc_store_rejects_tiny_split_length() {
        let state = stub_state();
        let owner = test_user("ada");
        let token = bearer_for(&state, &owner);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!(
                "/loadingdocstores?userid={}&split_length=1",
                owner.id()
            ))
            .insert_header(("authorization", format!("Bearer {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
