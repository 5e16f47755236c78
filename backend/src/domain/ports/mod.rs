//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports ([`UserAccounts`], [`Surveys`]) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod password_hasher;
mod survey_repository;
mod surveys;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use survey_repository::{MockOperatingSystemRepository, MockSurveyResultRepository};
pub use survey_repository::{
    OperatingSystemRepository, SurveyPersistenceError, SurveyResultRepository,
};
#[cfg(test)]
pub use surveys::MockSurveys;
pub use surveys::Surveys;
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};
