//! Survey data model: ratings, operating systems, and recorded results.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use super::{Error, UserId};

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 5;
/// Maximum allowed length for an operating system name.
pub const OS_NAME_MAX: usize = 50;

/// Rated category within a survey submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyField {
    /// Python proficiency rating.
    Python,
    /// Relational database proficiency rating.
    Rdb,
    /// General programming proficiency rating.
    Programming,
    /// Operating system label.
    Os,
}

impl SurveyField {
    /// Payload field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Rdb => "rdb",
            Self::Programming => "programming",
            Self::Os => "os",
        }
    }
}

/// Validation errors raised while reading a survey submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyValidationError {
    /// A required field was absent, null, or blank.
    Missing { field: SurveyField },
    /// A rating did not parse as an integer.
    NotAnInteger { field: SurveyField },
    /// A rating fell outside `RATING_MIN..=RATING_MAX`.
    OutOfRange { field: SurveyField, value: i64 },
    /// The operating system label exceeds the column limit.
    OsNameTooLong { max: usize },
}

impl SurveyValidationError {
    fn field(&self) -> SurveyField {
        match self {
            Self::Missing { field }
            | Self::NotAnInteger { field }
            | Self::OutOfRange { field, .. } => *field,
            Self::OsNameTooLong { .. } => SurveyField::Os,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing_field",
            Self::NotAnInteger { .. } => "not_an_integer",
            Self::OutOfRange { .. } => "out_of_range",
            Self::OsNameTooLong { .. } => "too_long",
        }
    }
}

impl fmt::Display for SurveyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field.as_str()),
            Self::NotAnInteger { field } => write!(f, "{} must be an integer", field.as_str()),
            Self::OutOfRange { field, value } => write!(
                f,
                "{} must be between {RATING_MIN} and {RATING_MAX}, got {value}",
                field.as_str()
            ),
            Self::OsNameTooLong { max } => write!(f, "os must be at most {max} characters"),
        }
    }
}

impl std::error::Error for SurveyValidationError {}

impl From<SurveyValidationError> for Error {
    fn from(value: SurveyValidationError) -> Self {
        let details = json!({ "field": value.field().as_str(), "code": value.code() });
        Self::invalid_request(value.to_string()).with_details(details)
    }
}

/// Satisfaction score in the inclusive range 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Check `value` against the accepted range.
    pub fn new(value: i64) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .filter(|rating| (RATING_MIN..=RATING_MAX).contains(rating))
            .map(Self)
    }

    /// Raw score.
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Rating as it arrives on the wire: an integer, or a string holding one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Integer(i64),
    Text(String),
    Other(Value),
}

impl RatingInput {
    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    fn parse(&self, field: SurveyField) -> Result<Rating, SurveyValidationError> {
        let value = match self {
            Self::Integer(value) => *value,
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| SurveyValidationError::NotAnInteger { field })?,
            Self::Other(_) => return Err(SurveyValidationError::NotAnInteger { field }),
        };
        Rating::new(value).ok_or(SurveyValidationError::OutOfRange { field, value })
    }
}

impl From<i64> for RatingInput {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for RatingInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Database-assigned operating system identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OperatingSystemId(i64);

impl OperatingSystemId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OperatingSystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trimmed, non-empty operating system label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OperatingSystemName(String);

impl OperatingSystemName {
    /// Validate and construct an [`OperatingSystemName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, SurveyValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SurveyValidationError::Missing {
                field: SurveyField::Os,
            });
        }
        if trimmed.chars().count() > OS_NAME_MAX {
            return Err(SurveyValidationError::OsNameTooLong { max: OS_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for OperatingSystemName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OperatingSystemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Deduplicated operating system label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OperatingSystem {
    #[schema(value_type = i64, example = 1)]
    id: OperatingSystemId,
    #[schema(value_type = String, example = "Linux")]
    name: OperatingSystemName,
}

impl OperatingSystem {
    /// Build an [`OperatingSystem`] from validated components.
    pub fn new(id: OperatingSystemId, name: OperatingSystemName) -> Self {
        Self { id, name }
    }

    /// Stable identifier.
    pub fn id(&self) -> OperatingSystemId {
        self.id
    }

    /// Label.
    pub fn name(&self) -> &OperatingSystemName {
        &self.name
    }
}

/// Database-assigned survey result identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SurveyResultId(i64);

impl SurveyResultId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SurveyResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Survey submission payload.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubmitSurveyRequest {
    #[schema(value_type = Option<u8>, example = 3)]
    pub python: Option<RatingInput>,
    #[schema(value_type = Option<u8>, example = 5)]
    pub rdb: Option<RatingInput>,
    #[schema(value_type = Option<u8>, example = 1)]
    pub programming: Option<RatingInput>,
    #[schema(example = "Linux")]
    pub os: Option<String>,
}

/// Validated survey submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySubmission {
    python: Rating,
    rdb: Rating,
    programming: Rating,
    os: OperatingSystemName,
}

impl SurveySubmission {
    /// Build a submission from validated components.
    pub fn new(
        python: Rating,
        rdb: Rating,
        programming: Rating,
        os: OperatingSystemName,
    ) -> Self {
        Self {
            python,
            rdb,
            programming,
            os,
        }
    }

    /// Python rating.
    pub fn python(&self) -> Rating {
        self.python
    }

    /// Relational database rating.
    pub fn rdb(&self) -> Rating {
        self.rdb
    }

    /// General programming rating.
    pub fn programming(&self) -> Rating {
        self.programming
    }

    /// Reported operating system label.
    pub fn os(&self) -> &OperatingSystemName {
        &self.os
    }
}

impl TryFrom<SubmitSurveyRequest> for SurveySubmission {
    type Error = SurveyValidationError;

    /// Presence of every field is checked before any value is parsed.
    fn try_from(request: SubmitSurveyRequest) -> Result<Self, Self::Error> {
        let rating = |input: Option<RatingInput>, field| {
            input
                .filter(|value| !value.is_blank())
                .ok_or(SurveyValidationError::Missing { field })
        };
        let python = rating(request.python, SurveyField::Python)?;
        let rdb = rating(request.rdb, SurveyField::Rdb)?;
        let programming = rating(request.programming, SurveyField::Programming)?;
        let os = request
            .os
            .filter(|name| !name.trim().is_empty())
            .ok_or(SurveyValidationError::Missing {
                field: SurveyField::Os,
            })?;

        Ok(Self {
            python: python.parse(SurveyField::Python)?,
            rdb: rdb.parse(SurveyField::Rdb)?,
            programming: programming.parse(SurveyField::Programming)?,
            os: OperatingSystemName::new(os)?,
        })
    }
}

/// One recorded rating submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SurveyResult {
    #[schema(value_type = i64, example = 1)]
    id: SurveyResultId,
    #[schema(value_type = i64, example = 1)]
    user: UserId,
    os: OperatingSystem,
    python: Rating,
    rdb: Rating,
    programming: Rating,
}

impl SurveyResult {
    /// Assemble a stored survey result.
    pub fn new(
        id: SurveyResultId,
        user: UserId,
        os: OperatingSystem,
        submission: &SurveySubmission,
    ) -> Self {
        Self {
            id,
            user,
            os,
            python: submission.python,
            rdb: submission.rdb,
            programming: submission.programming,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> SurveyResultId {
        self.id
    }

    /// Submitting user.
    pub fn user(&self) -> UserId {
        self.user
    }

    /// Reported operating system.
    pub fn os(&self) -> &OperatingSystem {
        &self.os
    }

    /// Python rating.
    pub fn python(&self) -> Rating {
        self.python
    }

    /// Relational database rating.
    pub fn rdb(&self) -> Rating {
        self.rdb
    }

    /// General programming rating.
    pub fn programming(&self) -> Rating {
        self.programming
    }
}
