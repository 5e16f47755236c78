//! Identity carried by an authenticated session.
//!
//! A claim pairs the user id with the user's session epoch at sign-in. Logging
//! out advances the stored epoch, so every claim issued before that point
//! stops resolving even if the client kept a copy of its cookie.

use super::{User, UserId};

/// User identity and epoch recorded in a session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaim {
    user: UserId,
    epoch: i64,
}

impl SessionClaim {
    /// Build a claim from raw session values.
    pub fn new(user: UserId, epoch: i64) -> Self {
        Self { user, epoch }
    }

    /// Claim for a freshly authenticated user.
    pub fn issue(user: &User) -> Self {
        Self::new(user.id(), user.session_epoch())
    }

    /// User the session belongs to.
    pub fn user(&self) -> UserId {
        self.user
    }

    /// Epoch the session was issued under.
    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    /// Whether the claim is still honoured for `user`.
    pub fn is_current_for(&self, user: &User) -> bool {
        self.user == user.id() && self.epoch == user.session_epoch()
    }
}
