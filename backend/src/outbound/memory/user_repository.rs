//! In-memory `UserRepository`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{PasswordHash, ProfileUpdate, User, UserId, Username};

#[derive(Debug)]
struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

#[derive(Debug, Default)]
struct UserState {
    last_id: i64,
    users: BTreeMap<UserId, StoredUser>,
}

impl UserState {
    fn owner_of(&self, username: &str) -> Option<&StoredUser> {
        self.users
            .values()
            .find(|stored| stored.user.username().as_ref() == username)
    }
}

/// Process-local user store with sequential identifiers starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<UserState>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, UserState>, UserPersistenceError> {
        self.state
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock()?;
        if state.owner_of(user.username.as_ref()).is_some() {
            return Err(UserPersistenceError::duplicate_username(
                user.username.as_ref(),
            ));
        }

        state.last_id += 1;
        let id = UserId::new(state.last_id);
        let created = User::new(
            id,
            user.username.clone(),
            user.email.clone(),
            user.name.clone(),
        );
        state.users.insert(
            id,
            StoredUser {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .owner_of(username.as_ref())
            .map(|stored| stored.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self.lock()?.owner_of(username).map(|stored| StoredCredentials {
            user: stored.user.clone(),
            password_hash: stored.password_hash.clone(),
        }))
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock()?;
        if let Some(username) = update.username() {
            let taken = state
                .owner_of(username.as_ref())
                .is_some_and(|owner| owner.user.id() != id);
            if taken {
                return Err(UserPersistenceError::duplicate_username(username.as_ref()));
            }
        }

        let Some(stored) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        let current = &stored.user;
        stored.user = User::new(
            id,
            update
                .username()
                .cloned()
                .unwrap_or_else(|| current.username().clone()),
            current.email().clone(),
            update.name().or(current.name()).cloned(),
        )
        .with_session_epoch(current.session_epoch());
        Ok(Some(stored.user.clone()))
    }

    async fn revoke_sessions(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock()?;
        let Some(stored) = state.users.get_mut(&id) else {
            return Ok(false);
        };
        let epoch = stored.user.session_epoch() + 1;
        stored.user = stored.user.clone().with_session_epoch(epoch);
        Ok(true)
    }
}
