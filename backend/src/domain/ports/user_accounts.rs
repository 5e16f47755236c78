//! Driving port for account use-cases.
//!
//! Inbound adapters read the caller's [`SessionClaim`] from their session and
//! pass it in as an `Option`; services decide what an absent or stale caller
//! means for each operation.

use async_trait::async_trait;

use crate::domain::{
    Error, LoginCredentials, RegisterUserRequest, SessionClaim, UpdateProfileRequest, User,
};

/// Account registration, authentication, and profile management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create a user from a registration payload.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Verify credentials and return the matching user.
    async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Resolve the caller to a stored user or fail with `forbidden`.
    async fn profile(&self, caller: Option<SessionClaim>) -> Result<User, Error>;

    /// Revoke every session issued to the caller.
    async fn logout(&self, caller: Option<SessionClaim>) -> Result<(), Error>;

    /// Update the caller's own profile.
    async fn update_profile(
        &self,
        caller: Option<SessionClaim>,
        request: UpdateProfileRequest,
    ) -> Result<User, Error>;
}
