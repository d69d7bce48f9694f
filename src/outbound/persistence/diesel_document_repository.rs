//! PostgreSQL-backed `DocumentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{DocumentPersistenceError, DocumentRepository};
use crate::domain::{Document, DocumentId, Title, UserId};

use super::models::{DocumentRow, NewDocumentRow};
use super::pool::{DbPool, PoolError};
use super::schema::documents;

/// Diesel-backed implementation of the `DocumentRepository` port.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: DbPool,
}

impl DieselDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain document persistence errors.
fn map_pool_error(error: PoolError) -> DocumentPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DocumentPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain document persistence errors.
fn map_diesel_error(error: diesel::result::Error, owner_id: &UserId) -> DocumentPersistenceError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DocumentPersistenceError::UnknownOwner {
                user_id: *owner_id,
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DocumentPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => DocumentPersistenceError::query("record not found"),
        _ => DocumentPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain document.
fn row_to_document(row: DocumentRow) -> Result<Document, DocumentPersistenceError> {
    let title = Title::new(row.title)
        .map_err(|err| DocumentPersistenceError::query(format!("stored title invalid: {err}")))?;
    Document::new(
        DocumentId::from_uuid(row.id),
        UserId::from_uuid(row.owner_id),
        title,
        row.content,
        row.created_at,
    )
    .map_err(|err| DocumentPersistenceError::query(format!("stored document invalid: {err}")))
}

#[async_trait]
impl DocumentRepository for DieselDocumentRepository {
    async fn insert(&self, document: &Document) -> Result<(), DocumentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewDocumentRow {
            id: *document.id().as_uuid(),
            owner_id: *document.owner_id().as_uuid(),
            title: document.title().as_str(),
            content: document.content(),
            created_at: document.created_at(),
        };

        diesel::insert_into(documents::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, document.owner_id()))
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Document>, DocumentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DocumentRow> = documents::table
            .filter(documents::owner_id.eq(owner_id.as_uuid()))
            .order(documents::created_at.desc())
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, owner_id))?;

        rows.into_iter().map(row_to_document).collect()
    }
}
