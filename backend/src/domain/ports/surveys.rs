//! Driving port for survey use-cases.

use async_trait::async_trait;

use crate::domain::{
    Error, OperatingSystem, OperatingSystemId, SessionClaim, SubmitSurveyRequest,
    SurveyResult, SurveyResultId,
};

/// Survey submission and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Surveys: Send + Sync {
    /// All recorded results.
    async fn list_results(&self) -> Result<Vec<SurveyResult>, Error>;

    /// One result, or `not_found`.
    async fn result(&self, id: SurveyResultId) -> Result<SurveyResult, Error>;

    /// Validate and record a submission owned by the caller.
    async fn submit(
        &self,
        caller: Option<SessionClaim>,
        request: SubmitSurveyRequest,
    ) -> Result<SurveyResult, Error>;

    /// All known operating systems.
    async fn list_operating_systems(&self) -> Result<Vec<OperatingSystem>, Error>;

    /// One operating system, or `not_found`.
    async fn operating_system(&self, id: OperatingSystemId) -> Result<OperatingSystem, Error>;
}
