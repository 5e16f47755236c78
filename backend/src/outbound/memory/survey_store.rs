//! In-memory survey ports.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    OperatingSystemRepository, SurveyPersistenceError, SurveyResultRepository,
};
use crate::domain::{
    OperatingSystem, OperatingSystemId, SurveyResult, SurveyResultId, SurveySubmission, UserId,
};

#[derive(Debug, Default)]
struct SurveyState {
    operating_systems: Vec<OperatingSystem>,
    results: Vec<SurveyResult>,
}

impl SurveyState {
    fn operating_system_named(&mut self, submission: &SurveySubmission) -> OperatingSystem {
        if let Some(existing) = self
            .operating_systems
            .iter()
            .find(|os| os.name() == submission.os())
        {
            return existing.clone();
        }
        let created = OperatingSystem::new(
            OperatingSystemId::new(next_id(self.operating_systems.len())),
            submission.os().clone(),
        );
        self.operating_systems.push(created.clone());
        created
    }
}

/// Identifiers are 1-based positions, as records are never deleted.
fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |len| len.saturating_add(1))
}

/// Process-local store serving both survey ports.
#[derive(Debug, Default)]
pub struct InMemorySurveyStore {
    state: Mutex<SurveyState>,
}

impl InMemorySurveyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, SurveyState>, SurveyPersistenceError> {
        self.state
            .lock()
            .map_err(|_| SurveyPersistenceError::query("survey store lock poisoned"))
    }
}

#[async_trait]
impl OperatingSystemRepository for InMemorySurveyStore {
    async fn list(&self) -> Result<Vec<OperatingSystem>, SurveyPersistenceError> {
        Ok(self.lock()?.operating_systems.clone())
    }

    async fn find_by_id(
        &self,
        id: OperatingSystemId,
    ) -> Result<Option<OperatingSystem>, SurveyPersistenceError> {
        Ok(self
            .lock()?
            .operating_systems
            .iter()
            .find(|os| os.id() == id)
            .cloned())
    }
}

#[async_trait]
impl SurveyResultRepository for InMemorySurveyStore {
    async fn list(&self) -> Result<Vec<SurveyResult>, SurveyPersistenceError> {
        Ok(self.lock()?.results.clone())
    }

    async fn find_by_id(
        &self,
        id: SurveyResultId,
    ) -> Result<Option<SurveyResult>, SurveyPersistenceError> {
        Ok(self
            .lock()?
            .results
            .iter()
            .find(|result| result.id() == id)
            .cloned())
    }

    async fn record(
        &self,
        user: UserId,
        submission: &SurveySubmission,
    ) -> Result<SurveyResult, SurveyPersistenceError> {
        let mut state = self.lock()?;
        let os = state.operating_system_named(submission);
        let result = SurveyResult::new(
            SurveyResultId::new(next_id(state.results.len())),
            user,
            os,
            submission,
        );
        state.results.push(result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OperatingSystemName, Rating};
    use rstest::{fixture, rstest};

    fn submission(os: &str) -> SurveySubmission {
        let rating = Rating::new(3).expect("rating");
        SurveySubmission::new(
            rating,
            rating,
            rating,
            OperatingSystemName::new(os).expect("valid name"),
        )
    }

    #[fixture]
    fn store() -> InMemorySurveyStore {
        InMemorySurveyStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn repeated_names_share_one_operating_system(store: InMemorySurveyStore) {
        let first = store
            .record(UserId::new(1), &submission("Linux"))
            .await
            .expect("first");
        let second = store
            .record(UserId::new(2), &submission("Linux"))
            .await
            .expect("second");

        assert_eq!(first.os(), second.os());
        assert_ne!(first.id(), second.id());
        let systems = OperatingSystemRepository::list(&store).await.expect("list");
        assert_eq!(systems.len(), 1);
        let results = SurveyResultRepository::list(&store).await.expect("list");
        assert_eq!(results.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn distinct_names_get_distinct_ids(store: InMemorySurveyStore) {
        store
            .record(UserId::new(1), &submission("Linux"))
            .await
            .expect("linux");
        let mac = store
            .record(UserId::new(1), &submission("macOS"))
            .await
            .expect("mac");
        assert_eq!(mac.os().id(), OperatingSystemId::new(2));
        let found = OperatingSystemRepository::find_by_id(&store, OperatingSystemId::new(2))
            .await
            .expect("lookup");
        assert_eq!(found.as_ref().map(|os| os.name().as_ref()), Some("macOS"));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_ids_are_absent(store: InMemorySurveyStore) {
        let result = SurveyResultRepository::find_by_id(&store, SurveyResultId::new(1))
            .await
            .expect("lookup");
        assert!(result.is_none());
    }
}
