//! Domain primitives, services, and ports.
//!
//! Purpose: Define strongly typed entities for accounts and surveys, the
//! services that validate and apply each use-case, and the ports through
//! which those services reach storage and password hashing. Nothing here
//! depends on HTTP or a database driver.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure type.
//! - User, Username, FullName: account identity.
//! - SurveyResult, OperatingSystem, Rating: survey records.
//! - UserAccountService / SurveyService: driving port implementations.

pub mod account;
pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod session;
pub mod survey;
pub mod survey_service;
pub mod trace_id;
pub mod user;

pub use self::account::{ProfileUpdate, RegisterUserRequest, Registration, UpdateProfileRequest};
pub use self::account_service::UserAccountService;
pub use self::auth::{LoginCredentials, LoginValidationError, Password, PasswordHash};
pub use self::error::{Error, ErrorCode};
pub use self::session::SessionClaim;
pub use self::survey::{
    OperatingSystem, OperatingSystemId, OperatingSystemName, Rating, RatingInput,
    SubmitSurveyRequest, SurveyField, SurveyResult, SurveyResultId, SurveySubmission,
    SurveyValidationError,
};
pub use self::survey_service::SurveyService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, FullName, NameField, PersonName, User, UserDto, UserId, UserValidationError,
    Username,
};
