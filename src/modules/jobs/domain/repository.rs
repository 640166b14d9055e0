/// Repository trait for job persistence
///
/// Defines the interface for the durable job queue. Implementation uses
/// Diesel with PostgreSQL.
use crate::modules::jobs::domain::entities::{Job, JobRecord, JobStatus};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Enqueue a new job
    async fn enqueue(&self, job: Job) -> AppResult<JobRecord>;

    /// Dequeue the next pending job (atomic operation using SELECT FOR UPDATE SKIP LOCKED)
    /// Selects lowest priority number first, oldest created_at as tiebreak.
    /// Returns None if no jobs are available
    async fn dequeue(&self) -> AppResult<Option<JobRecord>>;

    /// Mark job as completed with result counters
    async fn mark_completed(
        &self,
        job_id: Uuid,
        items_collected: i32,
        errors_count: i32,
    ) -> AppResult<()>;

    /// Mark job as failed with error message
    async fn mark_failed(&self, job_id: Uuid, error: &str, errors_count: i32) -> AppResult<()>;

    /// Find a pending or processing job of the given type targeting a post id.
    /// Used to guarantee at most one in-flight follow-up job per post.
    async fn find_duplicate_pending(
        &self,
        job_type: &str,
        post_id: &str,
    ) -> AppResult<Option<JobRecord>>;

    /// Whether any pending or processing job of the given type exists.
    /// Used to refuse a second concurrent batch scrape.
    async fn has_active_of_type(&self, job_type: &str) -> AppResult<bool>;

    /// Get job by ID
    async fn get_by_id(&self, job_id: Uuid) -> AppResult<Option<JobRecord>>;

    /// Recent jobs with optional status filter (for the API surface)
    async fn list_recent(
        &self,
        status: Option<JobStatus>,
        limit: i64,
    ) -> AppResult<Vec<JobRecord>>;

    /// Delete old completed/failed jobs (cleanup)
    async fn delete_old_completed(&self, days: i32) -> AppResult<usize>;

    /// Get job statistics
    async fn get_statistics(&self) -> AppResult<JobStatistics>;
}

/// Job queue statistics
#[derive(Debug, Clone)]
pub struct JobStatistics {
    pub pending_count: i64,
    pub processing_count: i64,
    pub completed_count: i64,
    pub failed_count: i64,
    pub total_count: i64,
}
