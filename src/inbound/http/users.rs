//! User registration and lookup handlers.
//!
//! ```text
//! POST /users/ {"username":"ada","email":"ada@example.com","password":"pw"}
//! GET /users/ada
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::UserPersistenceError;
use crate::domain::{
    EmailAddress, Error, User, UserId, UserValidationError, Username, validate_full_name,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /users/`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Requested login handle.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Optional display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Plaintext password; stored only as a hash.
    #[serde(default)]
    pub password: Option<String>,
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::InvalidId => "userId",
        UserValidationError::InvalidEmail | UserValidationError::EmailTooLong { .. } => "email",
        UserValidationError::FullNameTooLong { .. } => "fullName",
        _ => "username",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

pub(crate) fn map_user_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Duplicate { constraint } => {
            Error::invalid_request("Username or email already exists.")
                .with_details(json!({ "constraint": constraint }))
        }
        UserPersistenceError::Connection { .. } => {
            Error::service_unavailable("user storage is unavailable")
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user query failed: {message}"))
        }
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid request or duplicate username/email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users/")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let password = match payload.password {
        Some(password) if !password.is_empty() => password,
        _ => {
            return Err(Error::invalid_request("Password is required")
                .with_details(json!({ "field": "password" })));
        }
    };
    let username = Username::new(payload.username).map_err(map_user_validation_error)?;
    let email = EmailAddress::new(payload.email).map_err(map_user_validation_error)?;
    if let Some(full_name) = payload.full_name.as_deref() {
        validate_full_name(full_name).map_err(map_user_validation_error)?;
    }
    let user = User::new(UserId::random(), username, email, payload.full_name);

    let hasher = state.hasher.clone();
    let password_hash = web::block(move || hasher.hash(&password))
        .await
        .map_err(|err| Error::internal(format!("hashing task failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))?;

    state
        .users
        .create(&user, &password_hash)
        .await
        .map_err(map_user_persistence_error)?;
    Ok(HttpResponse::Created().json(user))
}

/// Fetch a user by username.
#[utoipa::path(
    get,
    path = "/users/{username}",
    params(("username" = String, Path, description = "Login handle")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 400, description = "Invalid username", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{username}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let username = Username::new(path.into_inner()).map_err(map_user_validation_error)?;
    let user = state
        .users
        .find_by_username(&username)
        .await
        .map_err(map_user_persistence_error)?
        .ok_or_else(|| Error::not_found("User not found"))?;
    Ok(web::Json(user))
}
