/// Diesel-based implementation of RunRepository
use crate::modules::runs::domain::entities::{Run, RunStatus, RunTotals, RunType};
use crate::modules::runs::domain::repository::RunRepository;
use crate::modules::runs::infrastructure::models::{NewRun, RunModel};
use crate::schema::scraper_runs;
use crate::shared::database::DbPool;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use diesel::prelude::*;
use std::time::Duration;
use uuid::Uuid;

pub struct RunRepositoryImpl {
    pool: DbPool,
}

impl RunRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_conn(
        &self,
    ) -> AppResult<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::PgConnection>>,
    > {
        self.pool
            .get()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get connection: {}", e)))
    }
}

#[async_trait]
impl RunRepository for RunRepositoryImpl {
    async fn create(&self, run_type: RunType) -> AppResult<Uuid> {
        let mut conn = self.get_conn()?;

        let new_run = NewRun {
            run_type: run_type.as_str(),
            status: RunStatus::Running.as_str(),
        };

        let id: Uuid = diesel::insert_into(scraper_runs::table)
            .values(&new_run)
            .returning(scraper_runs::id)
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to create run: {}", e)))?;

        Ok(id)
    }

    async fn complete(&self, run_id: Uuid, totals: RunTotals) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::sql_query(
            "UPDATE scraper_runs \
             SET status = 'completed', \
                 completed_at = NOW(), \
                 duration_seconds = EXTRACT(EPOCH FROM (NOW() - started_at)), \
                 items_collected = $2, \
                 comments_collected = $3, \
                 errors_count = $4 \
             WHERE id = $1 AND status = 'running'",
        )
        .bind::<diesel::sql_types::Uuid, _>(run_id)
        .bind::<diesel::sql_types::Integer, _>(totals.items_collected)
        .bind::<diesel::sql_types::Integer, _>(totals.comments_collected)
        .bind::<diesel::sql_types::Integer, _>(totals.errors_count)
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to complete run: {}", e)))?;

        Ok(())
    }

    async fn fail(&self, run_id: Uuid, error: &str, totals: RunTotals) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::sql_query(
            "UPDATE scraper_runs \
             SET status = 'failed', \
                 completed_at = NOW(), \
                 duration_seconds = EXTRACT(EPOCH FROM (NOW() - started_at)), \
                 items_collected = $2, \
                 comments_collected = $3, \
                 errors_count = $4, \
                 error_message = $5 \
             WHERE id = $1 AND status = 'running'",
        )
        .bind::<diesel::sql_types::Uuid, _>(run_id)
        .bind::<diesel::sql_types::Integer, _>(totals.items_collected)
        .bind::<diesel::sql_types::Integer, _>(totals.comments_collected)
        .bind::<diesel::sql_types::Integer, _>(totals.errors_count)
        .bind::<diesel::sql_types::Text, _>(error)
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to fail run: {}", e)))?;

        Ok(())
    }

    async fn fail_stale(&self, threshold: Duration) -> AppResult<usize> {
        let mut conn = self.get_conn()?;

        let swept = diesel::sql_query(
            "UPDATE scraper_runs \
             SET status = 'failed', \
                 completed_at = NOW(), \
                 duration_seconds = EXTRACT(EPOCH FROM (NOW() - started_at)), \
                 error_message = 'Run abandoned: worker restarted' \
             WHERE status = 'running' \
               AND started_at < NOW() - ($1 * INTERVAL '1 second')",
        )
        .bind::<diesel::sql_types::Double, _>(threshold.as_secs_f64())
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to sweep stale runs: {}", e)))?;

        Ok(swept)
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Run>> {
        let mut conn = self.get_conn()?;

        let models: Vec<RunModel> = scraper_runs::table
            .order(scraper_runs::started_at.desc())
            .limit(limit)
            .load(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to list runs: {}", e)))?;

        Ok(models.into_iter().map(|m| m.to_domain()).collect())
    }
}
