/// Repository trait for post and comment persistence
use crate::modules::posts::domain::entities::{Comment, EngagementSnapshot, Post};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a newly ingested post. Re-ingesting an existing id is a no-op
    /// for core fields; returns true when a row was actually inserted.
    async fn insert_post(&self, post: &Post) -> AppResult<bool>;

    /// Get post by ID
    async fn get_by_id(&self, post_id: &str) -> AppResult<Option<Post>>;

    /// Insert comments not already stored (by id). Returns how many were new.
    async fn insert_new_comments(&self, comments: &[Comment]) -> AppResult<usize>;

    /// Tracked, unexpired posts due for a comment rescrape, freshest first.
    /// Applies the 15-minute spacing rule and caps the batch size.
    async fn find_rescrape_candidates(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Post>>;

    /// Refresh the engagement snapshot and bump rescrape bookkeeping after a
    /// successful follow-up.
    async fn record_rescrape(
        &self,
        post_id: &str,
        snapshot: EngagementSnapshot,
        now: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Posts posted within the last `window_hours`, the candidate set for
    /// read-time heat ranking.
    async fn recent_posts(&self, window_hours: i64) -> AppResult<Vec<Post>>;
}
