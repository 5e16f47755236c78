//! Builders wiring repositories into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use survey_backend::domain::ports::{
    OperatingSystemRepository, PasswordHasher, SurveyResultRepository, UserRepository,
};
use survey_backend::domain::{SurveyService, UserAccountService};
use survey_backend::inbound::http::state::HttpState;
use survey_backend::outbound::memory::{InMemorySurveyStore, InMemoryUserRepository};
use survey_backend::outbound::persistence::{DieselSurveyRepository, DieselUserRepository};
use survey_backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Assemble both services over one user store and one survey store.
fn state_from_stores<U, S, H>(users: Arc<U>, surveys: Arc<S>, hasher: Arc<H>) -> HttpState
where
    U: UserRepository + 'static,
    S: OperatingSystemRepository + SurveyResultRepository + 'static,
    H: PasswordHasher + 'static,
{
    HttpState::new(
        Arc::new(UserAccountService::new(users.clone(), hasher)),
        Arc::new(SurveyService::new(users, surveys.clone(), surveys)),
    )
}

/// Build the shared HTTP state, using PostgreSQL when a pool is configured
/// and in-memory stores otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let state = match &config.db_pool {
        Some(pool) => state_from_stores(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselSurveyRepository::new(pool.clone())),
            hasher,
        ),
        None => state_from_stores(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySurveyStore::new()),
            hasher,
        ),
    };
    web::Data::new(state)
}
