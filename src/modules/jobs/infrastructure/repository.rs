/// Diesel-based implementation of JobRepository
///
/// Uses PostgreSQL with SELECT FOR UPDATE SKIP LOCKED for atomic job dequeuing.
use crate::modules::jobs::domain::entities::{Job, JobRecord, JobStatus};
use crate::modules::jobs::domain::repository::{JobRepository, JobStatistics};
use crate::modules::jobs::infrastructure::models::{NewJob, ScrapeJobModel};
use crate::schema::scrape_jobs;
use crate::shared::database::DbPool;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

/// Helper struct for COUNT queries
#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    count: i64,
}

pub struct JobRepositoryImpl {
    pool: DbPool,
}

impl JobRepositoryImpl {
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
impl JobRepository for JobRepositoryImpl {
    async fn enqueue(&self, job: Job) -> AppResult<JobRecord> {
        let new_job = NewJob {
            job_type: job.spec.job_type().to_string(),
            config: job.spec.config_json(),
            priority: job.priority,
        };

        let mut conn = self.get_conn()?;

        let inserted: ScrapeJobModel = diesel::insert_into(scrape_jobs::table)
            .values(&new_job)
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to enqueue job: {}", e)))?;

        Ok(inserted.to_job_record())
    }

    async fn dequeue(&self) -> AppResult<Option<JobRecord>> {
        let mut conn = self.get_conn()?;

        // Atomic claim: lowest priority number first, FIFO within a priority.
        // SKIP LOCKED keeps two overlapping workers from claiming the same row.
        let result: Option<ScrapeJobModel> = diesel::sql_query(
            r#"
            UPDATE scrape_jobs
            SET status = 'processing',
                started_at = NOW()
            WHERE id = (
                SELECT id
                FROM scrape_jobs
                WHERE status = 'pending'
                ORDER BY priority ASC, created_at ASC
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, job_type, config, priority, status,
                      created_at, started_at, completed_at,
                      items_collected, errors_count, error_message
            "#,
        )
        .get_result(&mut conn)
        .optional()
        .map_err(|e| AppError::DatabaseError(format!("Failed to dequeue job: {}", e)))?;

        Ok(result.map(|job| job.to_job_record()))
    }

    async fn mark_completed(
        &self,
        job_id: Uuid,
        items_collected: i32,
        errors_count: i32,
    ) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::sql_query(
            "UPDATE scrape_jobs
             SET status = 'completed', completed_at = NOW(),
                 items_collected = $2, errors_count = $3
             WHERE id = $1",
        )
        .bind::<diesel::sql_types::Uuid, _>(job_id)
        .bind::<diesel::sql_types::Integer, _>(items_collected)
        .bind::<diesel::sql_types::Integer, _>(errors_count)
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to mark job as completed: {}", e)))?;

        Ok(())
    }

    async fn mark_failed(&self, job_id: Uuid, error: &str, errors_count: i32) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        // Terminal: failed jobs are never retried automatically
        diesel::sql_query(
            "UPDATE scrape_jobs
             SET status = 'failed', completed_at = NOW(),
                 error_message = $2, errors_count = $3
             WHERE id = $1",
        )
        .bind::<diesel::sql_types::Uuid, _>(job_id)
        .bind::<diesel::sql_types::Text, _>(error)
        .bind::<diesel::sql_types::Integer, _>(errors_count)
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to mark job as failed: {}", e)))?;

        Ok(())
    }

    async fn find_duplicate_pending(
        &self,
        job_type: &str,
        post_id: &str,
    ) -> AppResult<Option<JobRecord>> {
        let mut conn = self.get_conn()?;

        // Content-addressed dedup on the JSONB config
        let job: Option<ScrapeJobModel> = diesel::sql_query(
            "SELECT id, job_type, config, priority, status,
                    created_at, started_at, completed_at,
                    items_collected, errors_count, error_message
             FROM scrape_jobs
             WHERE job_type = $1
               AND status IN ('pending', 'processing')
               AND config->>'post_id' = $2
             LIMIT 1",
        )
        .bind::<diesel::sql_types::Text, _>(job_type)
        .bind::<diesel::sql_types::Text, _>(post_id)
        .get_result(&mut conn)
        .optional()
        .map_err(|e| AppError::DatabaseError(format!("Failed to check duplicate job: {}", e)))?;

        Ok(job.map(|j| j.to_job_record()))
    }

    async fn has_active_of_type(&self, job_type: &str) -> AppResult<bool> {
        let mut conn = self.get_conn()?;

        let result: CountResult = diesel::sql_query(
            "SELECT COUNT(*) as count FROM scrape_jobs
             WHERE job_type = $1 AND status IN ('pending', 'processing')",
        )
        .bind::<diesel::sql_types::Text, _>(job_type)
        .get_result(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to check active jobs: {}", e)))?;

        Ok(result.count > 0)
    }

    async fn get_by_id(&self, job_id: Uuid) -> AppResult<Option<JobRecord>> {
        let mut conn = self.get_conn()?;

        let job: Option<ScrapeJobModel> = scrape_jobs::table
            .find(job_id)
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get job by id: {}", e)))?;

        Ok(job.map(|j| j.to_job_record()))
    }

    async fn list_recent(
        &self,
        status: Option<JobStatus>,
        limit: i64,
    ) -> AppResult<Vec<JobRecord>> {
        let mut conn = self.get_conn()?;

        let jobs: Vec<ScrapeJobModel> = match status {
            Some(status) => diesel::sql_query(
                "SELECT id, job_type, config, priority, status,
                        created_at, started_at, completed_at,
                        items_collected, errors_count, error_message
                 FROM scrape_jobs
                 WHERE status = $1::scrape_job_status
                 ORDER BY created_at DESC
                 LIMIT $2",
            )
            .bind::<diesel::sql_types::Text, _>(status.to_string())
            .bind::<diesel::sql_types::BigInt, _>(limit)
            .load(&mut conn),
            None => diesel::sql_query(
                "SELECT id, job_type, config, priority, status,
                        created_at, started_at, completed_at,
                        items_collected, errors_count, error_message
                 FROM scrape_jobs
                 ORDER BY created_at DESC
                 LIMIT $1",
            )
            .bind::<diesel::sql_types::BigInt, _>(limit)
            .load(&mut conn),
        }
        .map_err(|e| AppError::DatabaseError(format!("Failed to list jobs: {}", e)))?;

        Ok(jobs.into_iter().map(|j| j.to_job_record()).collect())
    }

    async fn delete_old_completed(&self, days: i32) -> AppResult<usize> {
        let mut conn = self.get_conn()?;

        let deleted = diesel::sql_query(
            "DELETE FROM scrape_jobs
             WHERE status IN ('completed', 'failed')
             AND completed_at < NOW() - INTERVAL '1 day' * $1",
        )
        .bind::<diesel::sql_types::Integer, _>(days)
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete old jobs: {}", e)))?;

        Ok(deleted)
    }

    async fn get_statistics(&self) -> AppResult<JobStatistics> {
        let mut conn = self.get_conn()?;

        let pending: CountResult = diesel::sql_query(
            "SELECT COUNT(*) as count FROM scrape_jobs WHERE status = 'pending'",
        )
        .get_result(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to count pending: {}", e)))?;

        let processing: CountResult = diesel::sql_query(
            "SELECT COUNT(*) as count FROM scrape_jobs WHERE status = 'processing'",
        )
        .get_result(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to count processing: {}", e)))?;

        let completed: CountResult = diesel::sql_query(
            "SELECT COUNT(*) as count FROM scrape_jobs WHERE status = 'completed'",
        )
        .get_result(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to count completed: {}", e)))?;

        let failed: CountResult = diesel::sql_query(
            "SELECT COUNT(*) as count FROM scrape_jobs WHERE status = 'failed'",
        )
        .get_result(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to count failed: {}", e)))?;

        let total: CountResult = diesel::sql_query("SELECT COUNT(*) as count FROM scrape_jobs")
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to count total: {}", e)))?;

        Ok(JobStatistics {
            pending_count: pending.count,
            processing_count: processing.count,
            completed_count: completed.count,
            failed_count: failed.count,
            total_count: total.count,
        })
    }
}
