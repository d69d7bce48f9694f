//! Diesel row types for the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{documents, users};

/// Row read from the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Primary key.
    pub id: Uuid,
    /// Unique login handle.
    pub username: String,
    /// Unique contact address.
    pub email: String,
    /// Optional display name.
    pub full_name: Option<String>,
    /// Argon2id hash in PHC string format.
    pub password_hash: String,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insertable row for the `users` table.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    /// Primary key.
    pub id: Uuid,
    /// Unique login handle.
    pub username: &'a str,
    /// Unique contact address.
    pub email: &'a str,
    /// Optional display name.
    pub full_name: Option<&'a str>,
    /// Argon2id hash in PHC string format.
    pub password_hash: &'a str,
}

/// Row read from the `documents` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentRow {
    /// Primary key.
    pub id: Uuid,
    /// Owning user; cascades on user deletion.
    pub owner_id: Uuid,
    /// Document title.
    pub title: String,
    /// Full document text.
    pub content: String,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insertable row for the `documents` table.
#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocumentRow<'a> {
    /// Primary key.
    pub id: Uuid,
    /// Owning user; cascades on user deletion.
    pub owner_id: Uuid,
    /// Document title.
    pub title: &'a str,
    /// Full document text.
    pub content: &'a str,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}
