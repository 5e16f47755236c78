//! User account domain service.
//!
//! Implements the [`UserAccounts`] driving port on top of the user repository
//! and password hasher ports. Validation always runs before the caller is
//! resolved, and the caller is resolved before any uniqueness check.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    NewUser, PasswordHashError, PasswordHasher, UserAccounts, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, Password, PasswordHash, ProfileUpdate, RegisterUserRequest,
    Registration, SessionClaim, UpdateProfileRequest, User,
};

/// Map user repository failures onto domain errors.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} is already taken"))
        }
    }
}

/// Resolve an optional session claim to a stored user.
///
/// A missing claim, one whose user no longer exists, or one issued before
/// the user's last logout is `forbidden`.
pub(crate) async fn resolve_caller<U>(
    users: &U,
    caller: Option<SessionClaim>,
) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    let Some(claim) = caller else {
        return Err(Error::forbidden("authentication required"));
    };
    match users
        .find_by_id(claim.user())
        .await
        .map_err(map_user_persistence_error)?
    {
        Some(user) if claim.is_current_for(&user) => Ok(user),
        Some(user) => {
            debug!(
                user_id = %user.id(),
                claim_epoch = claim.epoch(),
                "session was revoked by a later logout"
            );
            Err(Error::forbidden("authentication required"))
        }
        None => {
            debug!(user_id = %claim.user(), "session refers to a missing user");
            Err(Error::forbidden("authentication required"))
        }
    }
}

/// Account service implementing [`UserAccounts`].
#[derive(Clone)]
pub struct UserAccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> UserAccountService<U, H> {
    /// Create a new service with the given repository and hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<U, H> UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(error.to_string())
    }

    async fn hash_password(&self, password: Password) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(Self::map_hash_error)
    }

    async fn verify_password(&self, password: Password, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(Self::map_hash_error)
    }

    async fn ensure_username_available(
        &self,
        update: &ProfileUpdate,
        caller: &User,
    ) -> Result<(), Error> {
        let Some(username) = update.username() else {
            return Ok(());
        };
        let owner = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_persistence_error)?;
        match owner {
            Some(owner) if owner.id() != caller.id() => {
                debug!(user_id = %caller.id(), %username, "profile update rejected: username taken");
                Err(Error::conflict(format!("username {username} is already taken")))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U, H> UserAccounts for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let registration = Registration::try_from(request)?;
        let taken = self
            .users
            .find_by_username(registration.username())
            .await
            .map_err(map_user_persistence_error)?
            .is_some();
        if taken {
            debug!(username = %registration.username(), "registration rejected: username taken");
            return Err(Error::conflict(format!(
                "username {} is already taken",
                registration.username()
            )));
        }

        let password_hash = self.hash_password(registration.password().clone()).await?;
        let new_user = NewUser {
            username: registration.username().clone(),
            email: registration.email().clone(),
            password_hash,
            name: registration.name().cloned(),
        };
        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), username = %user.username(), "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_persistence_error)?;
        let Some(stored) = stored else {
            debug!(username = credentials.username(), "login rejected: unknown username");
            return Err(Error::forbidden("invalid credentials"));
        };

        let matches = self
            .verify_password(credentials.password().clone(), stored.password_hash)
            .await?;
        if !matches {
            debug!(user_id = %stored.user.id(), "login rejected: password mismatch");
            return Err(Error::forbidden("invalid credentials"));
        }
        info!(user_id = %stored.user.id(), "user logged in");
        Ok(stored.user)
    }

    async fn profile(&self, caller: Option<SessionClaim>) -> Result<User, Error> {
        resolve_caller(self.users.as_ref(), caller).await
    }

    async fn logout(&self, caller: Option<SessionClaim>) -> Result<(), Error> {
        let user = resolve_caller(self.users.as_ref(), caller).await?;
        let revoked = self
            .users
            .revoke_sessions(user.id())
            .await
            .map_err(map_user_persistence_error)?;
        if !revoked {
            return Err(Error::forbidden("authentication required"));
        }
        info!(user_id = %user.id(), "user logged out");
        Ok(())
    }

    async fn update_profile(
        &self,
        caller: Option<SessionClaim>,
        request: UpdateProfileRequest,
    ) -> Result<User, Error> {
        let update = ProfileUpdate::try_from(request)?;
        let user = resolve_caller(self.users.as_ref(), caller).await?;
        self.ensure_username_available(&update, &user).await?;

        let updated = self
            .users
            .update_profile(user.id(), &update)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::forbidden("authentication required"))?;
        info!(user_id = %updated.id(), "profile updated");
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
