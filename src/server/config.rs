//! Server configuration read from the environment.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {name}")]
    Missing {
        /// Variable name.
        name: &'static str,
    },
    /// An environment variable was set but could not be parsed.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Why parsing failed.
        reason: String,
    },
}

impl ConfigError {
    fn missing(name: &'static str) -> Self {
        Self::Missing { name }
    }

    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Runtime configuration for the backend process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// HS256 signing secret for bearer tokens.
    pub secret_key: String,
    /// Root directory for uploaded corpus files.
    pub data_root: PathBuf,
    /// Base URL of the QA pipeline service.
    pub pipeline_url: Url,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_ROOT: &str = "data";

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup, mainly for tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|err| ConfigError::invalid("SERVER_PORT", err.to_string()))?,
            None => DEFAULT_PORT,
        };
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| ConfigError::missing("DATABASE_URL"))?;
        let secret_key = lookup("SECRET_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::missing("SECRET_KEY"))?;
        let data_root = lookup("DATA_ROOT")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT), PathBuf::from);
        let pipeline_url = lookup("QA_PIPELINE_URL")
            .ok_or_else(|| ConfigError::missing("QA_PIPELINE_URL"))
            .and_then(|raw| {
                Url::parse(&raw).map_err(|err| ConfigError::invalid("QA_PIPELINE_URL", err.to_string()))
            })?;

        Ok(Self {
            host,
            port,
            database_url,
            secret_key,
            data_root,
            pipeline_url,
        })
    }
}
