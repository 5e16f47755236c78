//! PostgreSQL-backed survey adapters.
//!
//! One repository serves both survey ports because results are always read
//! joined with their operating system.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{
    OperatingSystemRepository, SurveyPersistenceError, SurveyResultRepository,
};
use crate::domain::{
    OperatingSystem, OperatingSystemId, OperatingSystemName, Rating, SurveyResult,
    SurveyResultId, SurveySubmission, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    NewOperatingSystemRow, NewSurveyResultRow, OperatingSystemRow, SurveyResultRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{operating_systems, survey_results};

/// Diesel-backed implementation of the survey ports.
#[derive(Clone)]
pub struct DieselSurveyRepository {
    pool: DbPool,
}

impl DieselSurveyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> SurveyPersistenceError {
    map_pool_error(error, SurveyPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> SurveyPersistenceError {
    map_diesel_error(
        error,
        SurveyPersistenceError::query,
        SurveyPersistenceError::connection,
    )
}

fn row_to_operating_system(row: OperatingSystemRow) -> Result<OperatingSystem, SurveyPersistenceError> {
    let name = OperatingSystemName::new(&row.name).map_err(|err| {
        SurveyPersistenceError::query(format!("stored operating system {} is invalid: {err}", row.id))
    })?;
    Ok(OperatingSystem::new(OperatingSystemId::new(row.id), name))
}

fn stored_rating(value: i16, result_id: i64) -> Result<Rating, SurveyPersistenceError> {
    Rating::new(i64::from(value)).ok_or_else(|| {
        SurveyPersistenceError::query(format!(
            "stored survey result {result_id} has rating {value} out of range"
        ))
    })
}

fn rows_to_result(
    (row, os): (SurveyResultRow, OperatingSystemRow),
) -> Result<SurveyResult, SurveyPersistenceError> {
    if row.os_id != os.id {
        return Err(SurveyPersistenceError::query(format!(
            "survey result {} references operating system {} but joined {}",
            row.id, row.os_id, os.id
        )));
    }
    let submission = SurveySubmission::new(
        stored_rating(row.python, row.id)?,
        stored_rating(row.rdb, row.id)?,
        stored_rating(row.programming, row.id)?,
        OperatingSystemName::new(&os.name).map_err(|err| {
            SurveyPersistenceError::query(format!("stored operating system {} is invalid: {err}", os.id))
        })?,
    );
    Ok(SurveyResult::new(
        SurveyResultId::new(row.id),
        UserId::new(row.user_id),
        row_to_operating_system(os)?,
        &submission,
    ))
}

#[async_trait]
impl OperatingSystemRepository for DieselSurveyRepository {
    async fn list(&self) -> Result<Vec<OperatingSystem>, SurveyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<OperatingSystemRow> = operating_systems::table
            .select(OperatingSystemRow::as_select())
            .order_by(operating_systems::id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_operating_system).collect()
    }

    async fn find_by_id(
        &self,
        id: OperatingSystemId,
    ) -> Result<Option<OperatingSystem>, SurveyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<OperatingSystemRow> = operating_systems::table
            .find(id.get())
            .select(OperatingSystemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_operating_system).transpose()
    }
}

#[async_trait]
impl SurveyResultRepository for DieselSurveyRepository {
    async fn list(&self) -> Result<Vec<SurveyResult>, SurveyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(SurveyResultRow, OperatingSystemRow)> = survey_results::table
            .inner_join(operating_systems::table)
            .select((
                SurveyResultRow::as_select(),
                OperatingSystemRow::as_select(),
            ))
            .order_by(survey_results::id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(rows_to_result).collect()
    }

    async fn find_by_id(
        &self,
        id: SurveyResultId,
    ) -> Result<Option<SurveyResult>, SurveyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<(SurveyResultRow, OperatingSystemRow)> = survey_results::table
            .inner_join(operating_systems::table)
            .filter(survey_results::id.eq(id.get()))
            .select((
                SurveyResultRow::as_select(),
                OperatingSystemRow::as_select(),
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(rows_to_result).transpose()
    }

    async fn record(
        &self,
        user: UserId,
        submission: &SurveySubmission,
    ) -> Result<SurveyResult, SurveyPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let os_name = submission.os().as_ref();
        let rows = conn
            .transaction(|conn| {
                async move {
                    // The no-op update makes RETURNING yield the existing row.
                    let os: OperatingSystemRow = diesel::insert_into(operating_systems::table)
                        .values(NewOperatingSystemRow { name: os_name })
                        .on_conflict(operating_systems::name)
                        .do_update()
                        .set(operating_systems::name.eq(excluded(operating_systems::name)))
                        .returning(OperatingSystemRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let result: SurveyResultRow = diesel::insert_into(survey_results::table)
                        .values(NewSurveyResultRow {
                            user_id: user.get(),
                            os_id: os.id,
                            python: i16::from(submission.python().get()),
                            rdb: i16::from(submission.rdb().get()),
                            programming: i16::from(submission.programming().get()),
                        })
                        .returning(SurveyResultRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((result, os))
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)?;
        rows_to_result(rows)
    }
}
