//! Abstraction over the upstream content platform
//!
//! The worker talks to the platform only through this trait, so transports
//! can be swapped and tests can substitute a mock.

use crate::modules::feeds::domain::entities::ScrapeSort;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A post as fetched from the platform, before storage decisions.
#[derive(Debug, Clone)]
pub struct PlatformItem {
    pub id: String,
    pub feed: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub url: String,
    pub score: i32,
    pub upvote_ratio: f64,
    pub reply_count: i32,
    pub posted_at: DateTime<Utc>,
}

/// A reply in the discussion tree of an item.
///
/// `parent_id` is None for top-level replies; `depth` starts at zero there
/// and increases by one per nesting level.
#[derive(Debug, Clone)]
pub struct PlatformReply {
    pub id: String,
    pub author: String,
    pub content: String,
    pub score: i32,
    pub parent_id: Option<String>,
    pub depth: i32,
    pub posted_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Lists items from a feed using the given sort, time filter and page size.
    async fn list_items<'a>(
        &self,
        feed: &str,
        sort: ScrapeSort,
        time_filter: Option<&'a str>,
        limit: i32,
    ) -> AppResult<Vec<PlatformItem>>;

    /// Fetches a single item by id.
    async fn fetch_item(&self, feed: &str, item_id: &str) -> AppResult<PlatformItem>;

    /// Fetches the full reply tree of an item, flattened in depth-first
    /// order with parent links and depths preserved.
    async fn fetch_replies(&self, feed: &str, item_id: &str) -> AppResult<Vec<PlatformReply>>;
}
