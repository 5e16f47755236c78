//! Survey domain service implementing the [`Surveys`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::account_service::resolve_caller;
use crate::domain::ports::{
    OperatingSystemRepository, SurveyPersistenceError, SurveyResultRepository, Surveys,
    UserRepository,
};
use crate::domain::{
    Error, OperatingSystem, OperatingSystemId, SessionClaim, SubmitSurveyRequest,
    SurveyResult, SurveyResultId, SurveySubmission,
};

/// Survey service over user, operating system, and result repositories.
#[derive(Clone)]
pub struct SurveyService<U, O, R> {
    users: Arc<U>,
    operating_systems: Arc<O>,
    results: Arc<R>,
}

impl<U, O, R> SurveyService<U, O, R> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, operating_systems: Arc<O>, results: Arc<R>) -> Self {
        Self {
            users,
            operating_systems,
            results,
        }
    }
}

impl<U, O, R> SurveyService<U, O, R> {
    fn map_persistence_error(error: SurveyPersistenceError) -> Error {
        match error {
            SurveyPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("survey repository unavailable: {message}"))
            }
            SurveyPersistenceError::Query { message } => {
                Error::internal(format!("survey repository error: {message}"))
            }
        }
    }
}

#[async_trait]
impl<U, O, R> Surveys for SurveyService<U, O, R>
where
    U: UserRepository,
    O: OperatingSystemRepository,
    R: SurveyResultRepository,
{
    async fn list_results(&self) -> Result<Vec<SurveyResult>, Error> {
        self.results.list().await.map_err(Self::map_persistence_error)
    }

    async fn result(&self, id: SurveyResultId) -> Result<SurveyResult, Error> {
        self.results
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("survey result {id} not found")))
    }

    async fn submit(
        &self,
        caller: Option<SessionClaim>,
        request: SubmitSurveyRequest,
    ) -> Result<SurveyResult, Error> {
        let submission = SurveySubmission::try_from(request)?;
        let user = resolve_caller(self.users.as_ref(), caller)
            .await
            .inspect_err(|_| debug!("survey submission rejected: not authenticated"))?;

        let result = self
            .results
            .record(user.id(), &submission)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(
            survey_id = %result.id(),
            user_id = %user.id(),
            os = %result.os().name(),
            "survey result recorded"
        );
        Ok(result)
    }

    async fn list_operating_systems(&self) -> Result<Vec<OperatingSystem>, Error> {
        self.operating_systems
            .list()
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn operating_system(&self, id: OperatingSystemId) -> Result<OperatingSystem, Error> {
        self.operating_systems
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("operating system {id} not found")))
    }
}
