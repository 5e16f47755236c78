//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        id -> Int8,
        /// Unique login name (max 150 characters).
        username -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// Empty when the user has no name on record.
        first_name -> Varchar,
        last_name -> Varchar,
        /// Advanced on logout to revoke outstanding sessions.
        session_epoch -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Deduplicated operating system labels.
    operating_systems (id) {
        id -> Int8,
        /// Unique label (max 50 characters).
        name -> Varchar,
    }
}

diesel::table! {
    /// Survey submissions; ratings are constrained to 1..=5.
    survey_results (id) {
        id -> Int8,
        user_id -> Int8,
        os_id -> Int8,
        python -> Int2,
        rdb -> Int2,
        programming -> Int2,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(survey_results -> users (user_id));
diesel::joinable!(survey_results -> operating_systems (os_id));

diesel::allow_tables_to_appear_in_same_query!(operating_systems, survey_results, users);
