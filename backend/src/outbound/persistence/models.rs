//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;

use super::schema::{operating_systems, survey_results, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub session_epoch: i64,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Changeset for profile updates; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub username: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

/// Row struct for reading from the operating_systems table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = operating_systems)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OperatingSystemRow {
    pub id: i64,
    pub name: String,
}

/// Insertable struct for operating system labels.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = operating_systems)]
pub(crate) struct NewOperatingSystemRow<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the survey_results table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = survey_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SurveyResultRow {
    pub id: i64,
    pub user_id: i64,
    pub os_id: i64,
    pub python: i16,
    pub rdb: i16,
    pub programming: i16,
}

/// Insertable struct for survey submissions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = survey_results)]
pub(crate) struct NewSurveyResultRow {
    pub user_id: i64,
    pub os_id: i64,
    pub python: i16,
    pub rdb: i16,
    pub programming: i16,
}
