//! User data model.

use std::fmt;

use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::Error;

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 150;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum allowed length for a first or last name.
pub const PERSON_NAME_MAX: usize = 150;

/// Which half of a [`FullName`] a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    /// The given name.
    First,
    /// The family name.
    Last,
}

impl NameField {
    /// Payload field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first_name",
            Self::Last => "last_name",
        }
    }
}

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Username was missing or blank.
    EmptyUsername,
    /// Username exceeds the column limit.
    UsernameTooLong { max: usize },
    /// Email was missing or blank.
    EmptyEmail,
    /// Email exceeds the column limit.
    EmailTooLong { max: usize },
    /// Password was missing or empty.
    EmptyPassword,
    /// Only one of first and last name was supplied.
    IncompleteName,
    /// A name contains a decimal digit.
    NameContainsDigit { field: NameField },
    /// A name exceeds the column limit.
    NameTooLong { field: NameField, max: usize },
    /// A profile update supplied none of the editable fields.
    NoProfileChanges,
}

impl UserValidationError {
    /// Payload field the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyUsername | Self::UsernameTooLong { .. } => Some("username"),
            Self::EmptyEmail | Self::EmailTooLong { .. } => Some("email"),
            Self::EmptyPassword => Some("password"),
            Self::NameContainsDigit { field } | Self::NameTooLong { field, .. } => {
                Some(field.as_str())
            }
            Self::IncompleteName | Self::NoProfileChanges => None,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::EmptyEmail | Self::EmptyPassword => "missing_field",
            Self::UsernameTooLong { .. }
            | Self::EmailTooLong { .. }
            | Self::NameTooLong { .. } => "too_long",
            Self::IncompleteName => "incomplete_name",
            Self::NameContainsDigit { .. } => "contains_digit",
            Self::NoProfileChanges => "no_changes",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::IncompleteName => {
                write!(f, "first name and last name must be given together")
            }
            Self::NameContainsDigit { field } => {
                write!(f, "{} must not contain digits", field.as_str())
            }
            Self::NameTooLong { field, max } => {
                write!(f, "{} must be at most {max} characters", field.as_str())
            }
            Self::NoProfileChanges => write!(
                f,
                "at least one of username, first_name or last_name is required",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        let details = match value.field() {
            Some(field) => json!({ "field": field, "code": value.code() }),
            None => json!({ "code": value.code() }),
        };
        Self::invalid_request(value.to_string()).with_details(details)
    }
}

/// Database-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique login name, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Contact email address. Only presence and length are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A first or last name. Digits are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    fn new(value: &str, field: NameField) -> Result<Self, UserValidationError> {
        if value.chars().any(char::is_numeric) {
            return Err(UserValidationError::NameContainsDigit { field });
        }
        if value.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// First and last name, always held together.
///
/// # Examples
/// ```
/// use survey_backend::domain::FullName;
///
/// let name = FullName::from_parts(Some("Ada"), Some("Lovelace")).unwrap();
/// assert_eq!(name.unwrap().first().as_ref(), "Ada");
/// assert!(FullName::from_parts(None, None).unwrap().is_none());
/// assert!(FullName::from_parts(Some("Ada"), None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName {
    first: PersonName,
    last: PersonName,
}

impl FullName {
    /// Pair optional name inputs. Both or neither must be supplied.
    pub fn from_parts(
        first: Option<&str>,
        last: Option<&str>,
    ) -> Result<Option<Self>, UserValidationError> {
        match (first, last) {
            (None, None) => Ok(None),
            (Some(first), Some(last)) => Ok(Some(Self {
                first: PersonName::new(first, NameField::First)?,
                last: PersonName::new(last, NameField::Last)?,
            })),
            _ => Err(UserValidationError::IncompleteName),
        }
    }

    /// Rebuild a name from stored columns, where empty strings mean absent.
    pub fn from_stored(first: &str, last: &str) -> Result<Option<Self>, UserValidationError> {
        fn present(value: &str) -> Option<&str> {
            (!value.is_empty()).then_some(value)
        }
        Self::from_parts(present(first), present(last))
    }

    /// Given name.
    pub fn first(&self) -> &PersonName {
        &self.first
    }

    /// Family name.
    pub fn last(&self) -> &PersonName {
        &self.last
    }
}

/// Registered application user.
///
/// ## Invariants
/// - `username` is non-empty and unique across the store.
/// - the name is either fully present or absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "UserDto")]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    name: Option<FullName>,
    session_epoch: i64,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        name: Option<FullName>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            name,
            session_epoch: 0,
        }
    }

    /// Attach the stored session epoch.
    #[must_use]
    pub fn with_session_epoch(mut self, session_epoch: i64) -> Self {
        self.session_epoch = session_epoch;
        self
    }

    /// Counter advanced on logout; sessions issued under an older value are
    /// no longer accepted.
    pub fn session_epoch(&self) -> i64 {
        self.session_epoch
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Optional full name.
    pub fn name(&self) -> Option<&FullName> {
        self.name.as_ref()
    }

    /// Given name, or an empty string when no name is stored.
    pub fn first_name(&self) -> &str {
        self.name.as_ref().map_or("", |name| name.first().as_ref())
    }

    /// Family name, or an empty string when no name is stored.
    pub fn last_name(&self) -> &str {
        self.name.as_ref().map_or("", |name| name.last().as_ref())
    }
}

/// Wire representation of a [`User`].
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(as = User)]
pub struct UserDto {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "ada")]
    username: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "Ada")]
    first_name: String,
    #[schema(example = "Lovelace")]
    last_name: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            first_name: value.first_name().to_owned(),
            last_name: value.last_name().to_owned(),
            username: value.username.0,
            email: value.email.0,
        }
    }
}

#[cfg(test)]
mod tests;
