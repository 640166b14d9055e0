/// Repository trait for the feed registry
use crate::modules::feeds::domain::entities::Feed;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use std::collections::HashMap;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// All feeds currently enabled for scraping
    async fn active_feeds(&self) -> AppResult<Vec<Feed>>;

    /// Look up a feed by its unique name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Feed>>;

    /// Record that a feed was just scraped
    async fn touch_last_scraped(&self, feed_id: i32) -> AppResult<()>;

    /// Mapping of feed name -> ticker symbols attached to it, used for
    /// primary ticker resolution during ingestion
    async fn ticker_map(&self) -> AppResult<HashMap<String, Vec<String>>>;
}
