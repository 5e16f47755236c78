//! Account payloads and their validated forms.
//!
//! Request types mirror the JSON bodies accepted by the HTTP adapter: every
//! field is optional so that presence is checked here, in one pass, rather
//! than by the deserialiser.

use serde::Deserialize;
use utoipa::ToSchema;

use super::{EmailAddress, FullName, Password, UserValidationError, Username};

/// Treat missing, null, and blank strings alike.
fn supplied(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|trimmed| !trimmed.is_empty())
}

/// Registration payload.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "correct horse battery staple")]
    pub password: Option<String>,
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    #[schema(example = "Lovelace")]
    pub last_name: Option<String>,
}

/// Validated registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Password,
    name: Option<FullName>,
}

impl Registration {
    /// Requested login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password awaiting hashing.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Optional full name.
    pub fn name(&self) -> Option<&FullName> {
        self.name.as_ref()
    }
}

impl TryFrom<RegisterUserRequest> for Registration {
    type Error = UserValidationError;

    fn try_from(request: RegisterUserRequest) -> Result<Self, Self::Error> {
        let username = supplied(request.username.as_ref())
            .ok_or(UserValidationError::EmptyUsername)
            .and_then(Username::new)?;
        let email = supplied(request.email.as_ref())
            .ok_or(UserValidationError::EmptyEmail)
            .and_then(EmailAddress::new)?;
        let password = request
            .password
            .as_deref()
            .and_then(Password::new)
            .ok_or(UserValidationError::EmptyPassword)?;
        let name = FullName::from_parts(
            supplied(request.first_name.as_ref()),
            supplied(request.last_name.as_ref()),
        )?;

        Ok(Self {
            username,
            email,
            password,
            name,
        })
    }
}

/// Profile update payload. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    #[schema(example = "Byron")]
    pub last_name: Option<String>,
}

/// Validated profile changes; at least one field is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    username: Option<Username>,
    name: Option<FullName>,
}

impl ProfileUpdate {
    /// New login name, if one was requested.
    pub fn username(&self) -> Option<&Username> {
        self.username.as_ref()
    }

    /// New full name, if one was requested.
    pub fn name(&self) -> Option<&FullName> {
        self.name.as_ref()
    }
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = UserValidationError;

    fn try_from(request: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let username = supplied(request.username.as_ref());
        let first_name = supplied(request.first_name.as_ref());
        let last_name = supplied(request.last_name.as_ref());
        if username.is_none() && first_name.is_none() && last_name.is_none() {
            return Err(UserValidationError::NoProfileChanges);
        }

        let name = FullName::from_parts(first_name, last_name)?;
        let username = username.map(Username::new).transpose()?;
        Ok(Self { username, name })
    }
}
