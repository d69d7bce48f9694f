//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Stores users alongside their argon2 password hashes. Unique-constraint
//! violations on username or email surface as
//! [`UserPersistenceError::Duplicate`] so the HTTP layer can answer 400.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId, Username};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UserPersistenceError::duplicate(
                info.constraint_name().unwrap_or("users_unique").to_owned(),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain user, keeping the hash separate.
fn row_to_user(row: UserRow) -> Result<(User, String), UserPersistenceError> {
    let username = Username::new(row.username)
        .map_err(|err| UserPersistenceError::query(format!("stored username invalid: {err}")))?;
    let email = EmailAddress::new(row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email invalid: {err}")))?;
    let user = User::new(UserId::from_uuid(row.id), username, email, row.full_name);
    Ok((user, row.password_hash))
}

async fn fetch_by_username(
    pool: &DbPool,
    username: &Username,
) -> Result<Option<UserRow>, UserPersistenceError> {
    let mut conn = pool.get().await.map_err(map_pool_error)?;
    users::table
        .filter(users::username.eq(username.as_str()))
        .select(UserRow::as_select())
        .first(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_str(),
            email: user.email().as_str(),
            full_name: user.full_name(),
            password_hash,
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let row = fetch_by_username(&self.pool, username).await?;
        row.map(row_to_user)
            .transpose()
            .map(|found| found.map(|(user, _)| user))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user)
            .transpose()
            .map(|found| found.map(|(user, _)| user))
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, UserPersistenceError> {
        let row = fetch_by_username(&self.pool, username).await?;
        row.map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, UserPersistenceError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, UserPersistenceError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_conversion_preserves_fields() {
        let id = uuid::Uuid::new_v4();
        let row = UserRow {
            id,
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            full_name: Some("Ada Lovelace".to_owned()),
            password_hash: "argon2-hash".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let (user, hash) = row_to_user(row).expect("valid row converts");
        assert_eq!(user.id().as_uuid(), &id);
        assert_eq!(user.username().as_str(), "ada");
        assert_eq!(user.full_name(), Some("Ada Lovelace"));
        assert_eq!(hash, "argon2-hash");
    }

    #[rstest]
    fn corrupt_row_reports_query_error() {
        let row = UserRow {
            id: uuid::Uuid::new_v4(),
            username: "  ".to_owned(),
            email: "ada@example.com".to_owned(),
            full_name: None,
            password_hash: "hash".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let err = row_to_user(row).expect_err("blank username must fail");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
