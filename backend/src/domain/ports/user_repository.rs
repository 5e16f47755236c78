//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, FullName, PasswordHash, ProfileUpdate, User, UserId, Username,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already held by another user.
        DuplicateUsername { username: String } => "username already taken: {username}",
    }
}

/// User record awaiting insertion; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub name: Option<FullName>,
}

/// A user together with the stored credential used to verify logins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

/// Storage for registered users.
///
/// Adapters enforce username uniqueness and report collisions as
/// [`UserPersistenceError::DuplicateUsername`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its assigned identifier.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and their password hash for login verification.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Apply profile changes, returning `None` when the user does not exist.
    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Advance the user's session epoch so outstanding sessions stop
    /// resolving. Returns `false` when the user does not exist.
    async fn revoke_sessions(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}
