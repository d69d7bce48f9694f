//! Server construction and middleware wiring.

mod config;

pub use config::{AppConfig, ConfigError};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::corpus::{delete_files, load_doc_store, upload_file};
use crate::inbound::http::documents::{create_document, list_documents};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::query::query_pipeline;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::token::issue_token;
use crate::inbound::http::users::{create_user, get_user};
use crate::middleware::Trace;
use crate::outbound::corpus::FsCorpusStore;
use crate::outbound::persistence::{
    DbPool, DieselDocumentRepository, DieselUserRepository, PoolConfig, run_migrations,
};
use crate::outbound::pipeline::HttpQaPipeline;
use crate::outbound::security::{Argon2PasswordHasher, CredentialLoginService, JwtTokenService};

/// Build the shared HTTP state from a database pool and configuration.
fn build_http_state(config: &AppConfig, pool: DbPool) -> std::io::Result<web::Data<HttpState>> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let documents = Arc::new(DieselDocumentRepository::new(pool));
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let login = Arc::new(CredentialLoginService::new(users.clone(), hasher.clone()));
    let tokens = Arc::new(JwtTokenService::new(&config.secret_key));
    let corpus = Arc::new(FsCorpusStore::new(&config.data_root));
    let pipeline = Arc::new(
        HttpQaPipeline::new(config.pipeline_url.clone())
            .map_err(|err| std::io::Error::other(format!("pipeline client: {err}")))?,
    );

    Ok(web::Data::new(HttpState {
        users,
        documents,
        login,
        tokens,
        hasher,
        corpus,
        pipeline,
    }))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(create_user)
        .service(get_user)
        .service(create_document)
        .service(list_documents)
        .service(issue_token)
        .service(upload_file)
        .service(delete_files)
        .service(load_doc_store)
        .service(query_pipeline)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server bound per the configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state flipped once the listener is bound.
/// - `config`: environment-derived [`AppConfig`].
/// - `pool`: database pool already verified by migrations.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails or an adapter
/// cannot be constructed.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &AppConfig,
    pool: DbPool,
) -> std::io::Result<Server> {
    let http_state = build_http_state(config, pool)?;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Bootstrap the whole service: configuration, migrations, pool, listener.
///
/// # Errors
/// Returns [`std::io::Error`] when configuration is incomplete, migrations
/// fail, the pool cannot be created, or the socket cannot be bound.
pub async fn run() -> std::io::Result<()> {
    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    run_migrations(&config.database_url)
        .await
        .map_err(|err| std::io::Error::other(format!("migrations: {err}")))?;
    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, &config, pool)?;
    server.await
}
