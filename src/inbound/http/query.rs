//! Extractive question-answering handler.

use actix_web::{get, web};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, QaQuery, QaResult, QaValidationError, Question, TopK, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::BearerClaims;
use crate::inbound::http::corpus::map_pipeline_error;
use crate::inbound::http::state::HttpState;

/// Query parameters for `GET /queryPL`.
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Owner of the index being queried.
    pub userid: Uuid,
    /// The question to answer.
    pub q: String,
    /// Passages requested from the retriever.
    #[serde(rename = "top_k_Retr")]
    pub top_k_retr: u32,
    /// Answers requested from the reader.
    #[serde(rename = "top_k_Read")]
    pub top_k_read: u32,
}

fn map_qa_validation_error(err: QaValidationError) -> Error {
    let field = match err {
        QaValidationError::EmptyQuestion => "q",
        QaValidationError::SplitLengthOutOfRange { .. } => "split_length",
        QaValidationError::TopKOutOfRange { .. } => "top_k",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Run an extractive query against the user's document store.
#[utoipa::path(
    get,
    path = "/queryPL",
    params(
        ("userid" = Uuid, Query, description = "Owner of the index"),
        ("q" = String, Query, description = "Natural-language question"),
        ("top_k_Retr" = u32, Query, description = "Passages requested from the retriever"),
        ("top_k_Read" = u32, Query, description = "Answers requested from the reader")
    ),
    responses(
        (status = 200, description = "Ranked answers", body = QaResult),
        (status = 400, description = "Invalid query parameters", body = Error),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 403, description = "Token belongs to a different user", body = Error),
        (status = 503, description = "Pipeline unreachable", body = Error)
    ),
    tags = ["query"],
    operation_id = "queryPipeline"
)]
#[get("/queryPL")]
pub async fn query_pipeline(
    state: web::Data<HttpState>,
    claims: BearerClaims,
    params: web::Query<QueryParams>,
) -> ApiResult<web::Json<QaResult>> {
    let params = params.into_inner();
    let user_id = UserId::from_uuid(params.userid);
    claims.require_user(&user_id)?;

    let query = QaQuery {
        user_id,
        question: Question::new(params.q).map_err(map_qa_validation_error)?,
        retriever_top_k: TopK::new(params.top_k_retr).map_err(map_qa_validation_error)?,
        reader_top_k: TopK::new(params.top_k_read).map_err(map_qa_validation_error)?,
    };
    let result = state
        .pipeline
        .run_query(&query)
        .await
        .map_err(map_pipeline_error)?;
    Ok(web::Json(result))
}
