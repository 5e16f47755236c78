//! In-memory adapters used when no database is configured.
//!
//! State lives behind a `std::sync::Mutex`; no lock is held across an await.
//! Contents are lost when the process exits.

mod survey_store;
mod user_repository;

pub use survey_store::InMemorySurveyStore;
pub use user_repository::InMemoryUserRepository;
