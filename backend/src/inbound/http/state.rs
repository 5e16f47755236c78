//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` so they depend only on the
//! driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{Surveys, UserAccounts};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccounts>,
    pub surveys: Arc<dyn Surveys>,
}

impl HttpState {
    /// Bundle the account and survey use-cases.
    pub fn new(accounts: Arc<dyn UserAccounts>, surveys: Arc<dyn Surveys>) -> Self {
        Self { accounts, surveys }
    }
}
