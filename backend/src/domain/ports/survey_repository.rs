//! Ports for survey results and the operating systems they reference.

use async_trait::async_trait;

use crate::domain::{
    OperatingSystem, OperatingSystemId, SurveyResult, SurveyResultId, SurveySubmission, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by survey repository adapters.
    pub enum SurveyPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "survey repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "survey repository query failed: {message}",
    }
}

/// Read access to operating system labels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OperatingSystemRepository: Send + Sync {
    /// All operating systems in ascending id order.
    async fn list(&self) -> Result<Vec<OperatingSystem>, SurveyPersistenceError>;

    /// Fetch one operating system by identifier.
    async fn find_by_id(
        &self,
        id: OperatingSystemId,
    ) -> Result<Option<OperatingSystem>, SurveyPersistenceError>;
}

/// Storage for survey results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SurveyResultRepository: Send + Sync {
    /// All results with their operating system attached, in ascending id order.
    async fn list(&self) -> Result<Vec<SurveyResult>, SurveyPersistenceError>;

    /// Fetch one result by identifier.
    async fn find_by_id(
        &self,
        id: SurveyResultId,
    ) -> Result<Option<SurveyResult>, SurveyPersistenceError>;

    /// Record a submission for `user`.
    ///
    /// The operating system is looked up by name and created if unseen. The
    /// lookup, the creation, and the result insert are atomic: concurrent
    /// submissions naming the same new system produce one record.
    async fn record(
        &self,
        user: UserId,
        submission: &SurveySubmission,
    ) -> Result<SurveyResult, SurveyPersistenceError>;
}
