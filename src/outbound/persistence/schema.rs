//! Diesel table definitions for the backend schema.
//!
//! Kept in sync with the SQL migrations under `migrations/`.

diesel::table! {
    users (id) {
        id -> Uuid,
        #[max_length = 32]
        username -> Varchar,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 128]
        full_name -> Nullable<Varchar>,
        #[max_length = 255]
        password_hash -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    documents (id) {
        id -> Uuid,
        owner_id -> Uuid,
        #[max_length = 256]
        title -> Varchar,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(documents -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(users, documents);
