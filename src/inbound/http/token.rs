//! Token issuance handler.
//!
//! `POST /token` accepts a form-encoded username/password pair and returns a
//! signed bearer token on success.

use actix_web::{post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{AccessToken, Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Form body for `POST /token`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TokenRequest {
    /// Login handle.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password" })),
    }
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = AccessToken),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Incorrect credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "issueToken",
    security([])
)]
#[post("/token")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    payload: web::Form<TokenRequest>,
) -> ApiResult<web::Json<AccessToken>> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&payload.username, &payload.password)
        .map_err(map_login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    let token = state
        .tokens
        .issue(&user)
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(web::Json(token))
}
