//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every HTTP endpoint from the inbound layer, the domain
//! schemas they reference, and the bearer token security scheme. The
//! generated specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AccessToken, Answer, AnswerSpan, Document, Error, ErrorCode, QaResult, User};
use crate::inbound::http::documents::CreateDocumentRequest;
use crate::inbound::http::token::TokenRequest;
use crate::inbound::http::users::CreateUserRequest;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Document QA backend API",
        description = "Per-user document management and extractive question answering.",
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearer_auth" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::documents::create_document,
        crate::inbound::http::documents::list_documents,
        crate::inbound::http::token::issue_token,
        crate::inbound::http::corpus::upload_file,
        crate::inbound::http::corpus::delete_files,
        crate::inbound::http::corpus::load_doc_store,
        crate::inbound::http::query::query_pipeline,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Document,
        AccessToken,
        QaResult,
        Answer,
        AnswerSpan,
        Error,
        ErrorCode,
        CreateUserRequest,
        CreateDocumentRequest,
        TokenRequest,
    )),
    tags(
        (name = "users", description = "User registration and lookup"),
        (name = "documents", description = "Stored document management"),
        (name = "auth", description = "Token issuance"),
        (name = "corpus", description = "Uploaded corpus files and index builds"),
        (name = "query", description = "Extractive question answering"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn document_registers_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/users/",
            "/users/{username}",
            "/documents/",
            "/documents/{user_id}",
            "/token",
            "/uploadfiles",
            "/deletefiles",
            "/loadingdocstores",
            "/queryPL",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path} in OpenAPI document"
            );
        }
    }

    #[test]
    fn document_registers_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
