//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, FullName, PasswordHash, ProfileUpdate, User, UserId, Username,
};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
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

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Map write failures, turning unique violations into duplicate usernames.
fn write_error(error: diesel::result::Error, username: &str) -> UserPersistenceError {
    if is_unique_violation(&error) {
        UserPersistenceError::duplicate_username(username)
    } else {
        diesel_error(error)
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let corrupt = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    Ok(User::new(
        UserId::new(row.id),
        Username::new(&row.username).map_err(corrupt)?,
        EmailAddress::new(&row.email).map_err(corrupt)?,
        FullName::from_stored(&row.first_name, &row.last_name).map_err(corrupt)?,
    )
    .with_session_epoch(row.session_epoch))
}

fn optional_user(row: Option<UserRow>) -> Result<Option<User>, UserPersistenceError> {
    row.as_ref().map(row_to_user).transpose()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
            first_name: user.name.as_ref().map_or("", |name| name.first().as_ref()),
            last_name: user.name.as_ref().map_or("", |name| name.last().as_ref()),
        };

        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| write_error(err, row.username))?;
        row_to_user(&inserted)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        optional_user(row)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        optional_user(row)
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|row| {
            Ok(StoredCredentials {
                user: row_to_user(&row)?,
                password_hash: PasswordHash::new(row.password_hash),
            })
        })
        .transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changes = UserProfileChangeset {
            username: update.username().map(AsRef::as_ref),
            first_name: update.name().map(|name| name.first().as_ref()),
            last_name: update.name().map(|name| name.last().as_ref()),
        };

        let row = diesel::update(users::table.find(id.get()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| write_error(err, changes.username.unwrap_or_default()))?;
        optional_user(row)
    }

    async fn revoke_sessions(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(users::table.find(id.get()))
            .set(users::session_epoch.eq(users::session_epoch + 1))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated == 1)
    }
}
