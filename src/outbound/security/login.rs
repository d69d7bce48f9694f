//! Credential verification against the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{LoginService, PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::{Error, LoginCredentials, User, Username};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

/// Login service resolving credentials through the repository and hasher
/// ports.
///
/// Lookup failures and hash mismatches collapse into one unauthorized error
/// so responses do not reveal which usernames exist.
pub struct CredentialLoginService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialLoginService {
    /// Create a login service over the given ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

fn map_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { .. } => {
            Error::service_unavailable("user storage is unavailable")
        }
        other => Error::internal(other.to_string()),
    }
}

#[async_trait]
impl LoginService for CredentialLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let username = match Username::new(credentials.username()) {
            Ok(username) => username,
            Err(err) => {
                debug!(error = %err, "login with malformed username");
                return Err(Error::unauthorized(BAD_CREDENTIALS));
            }
        };

        let found = self
            .users
            .find_credentials(&username)
            .await
            .map_err(map_persistence_error)?;
        let Some((user, stored_hash)) = found else {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        };

        // Argon2 verification is CPU-bound; keep it off the async executor.
        let hasher = self.hasher.clone();
        let password = credentials.password().to_owned();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|err| Error::internal(format!("verification task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))?;

        if matches {
            Ok(user)
        } else {
            Err(Error::unauthorized(BAD_CREDENTIALS))
        }
    }
}
