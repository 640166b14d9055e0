use crate::modules::runs::domain::entities::{Run, RunTotals, RunType};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Opens a run in `running` state and returns its id.
    async fn create(&self, run_type: RunType) -> AppResult<Uuid>;

    /// Marks a run completed, recording duration and counters.
    async fn complete(&self, run_id: Uuid, totals: RunTotals) -> AppResult<()>;

    /// Marks a run failed with the given message and whatever counters accrued.
    async fn fail(&self, run_id: Uuid, error: &str, totals: RunTotals) -> AppResult<()>;

    /// Fails every run still `running` that started more than `threshold` ago.
    /// Returns the number of runs swept. Safe to call repeatedly.
    async fn fail_stale(&self, threshold: Duration) -> AppResult<usize>;

    /// Most recent runs, newest first.
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Run>>;
}
