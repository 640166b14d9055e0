//! Reddit implementation of the platform client
//!
//! Uses the public JSON listings, paced by a governor rate limiter so the
//! worker stays inside the unauthenticated quota (~60 requests/minute).

use crate::modules::feeds::domain::entities::ScrapeSort;
use crate::modules::platform::client::{PlatformClient, PlatformItem, PlatformReply};
use crate::modules::platform::dto::{ItemData, Listing, Replies, ReplyData, Thing};
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_warn};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
const USER_AGENT: &str = "tickerwatch/1.0 (forum engagement tracker)";

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

pub struct RedditClient {
    client: reqwest::Client,
    rate_limiter: DirectRateLimiter,
    base_url: String,
}

impl RedditClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        // 1 req/sec average with a burst of 3 keeps us under the public quota
        let quota = Quota::with_period(Duration::from_secs(1))
            .map(|q| q.allow_burst(NonZeroU32::new(3).unwrap_or(NonZeroU32::MIN)));

        Self {
            client: reqwest::Client::new(),
            rate_limiter: GovernorRateLimiter::direct(
                quota.unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN)),
            ),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T>(&self, url: &str) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Request to {} failed: {}", url, e)))?;

        match response.status().as_u16() {
            429 => {
                return Err(AppError::RateLimitError(format!(
                    "Upstream throttled request to {}",
                    url
                )))
            }
            404 => return Err(AppError::NotFound(format!("Resource not found: {}", url))),
            s if s >= 400 => {
                return Err(AppError::ExternalServiceError(format!(
                    "Upstream returned {} for {}",
                    s, url
                )))
            }
            _ => {}
        }

        let body = response.text().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to read response from {}: {}", url, e))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            AppError::SerializationError(format!("Failed to parse response from {}: {}", url, e))
        })
    }
}

impl Default for RedditClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformClient for RedditClient {
    async fn list_items<'a>(
        &self,
        feed: &str,
        sort: ScrapeSort,
        time_filter: Option<&'a str>,
        limit: i32,
    ) -> AppResult<Vec<PlatformItem>> {
        let mut url = format!(
            "{}/r/{}/{}.json?limit={}&raw_json=1",
            self.base_url, feed, sort, limit
        );
        if let Some(filter) = time_filter {
            url.push_str(&format!("&t={}", filter));
        }

        let listing: Listing = self.get_json(&url).await?;
        let mut items = Vec::with_capacity(listing.data.children.len());

        for thing in listing.data.children {
            if thing.kind != "t3" {
                continue;
            }
            match item_from_thing(&thing, feed, &self.base_url) {
                Ok(item) => items.push(item),
                Err(e) => log_warn!("Skipping malformed item in r/{}: {}", feed, e),
            }
        }

        log_debug!("Listed {} items from r/{}", items.len(), feed);
        Ok(items)
    }

    async fn fetch_item(&self, feed: &str, item_id: &str) -> AppResult<PlatformItem> {
        let url = format!(
            "{}/r/{}/comments/{}.json?limit=1&raw_json=1",
            self.base_url, feed, item_id
        );

        let listings: Vec<Listing> = self.get_json(&url).await?;
        let thing = listings
            .first()
            .and_then(|l| l.data.children.first())
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found in r/{}", item_id, feed)))?;

        item_from_thing(thing, feed, &self.base_url)
    }

    async fn fetch_replies(&self, feed: &str, item_id: &str) -> AppResult<Vec<PlatformReply>> {
        let url = format!(
            "{}/r/{}/comments/{}.json?limit=500&raw_json=1",
            self.base_url, feed, item_id
        );

        let listings: Vec<Listing> = self.get_json(&url).await?;
        let children = listings
            .into_iter()
            .nth(1)
            .map(|l| l.data.children)
            .unwrap_or_default();

        Ok(flatten_reply_tree(children))
    }
}

fn item_from_thing(thing: &Thing, feed: &str, base_url: &str) -> AppResult<PlatformItem> {
    let data: ItemData = serde_json::from_value(thing.data.clone())
        .map_err(|e| AppError::SerializationError(format!("Malformed item payload: {}", e)))?;

    Ok(PlatformItem {
        id: data.id,
        feed: feed.to_string(),
        title: data.title,
        author: data.author,
        content: data.selftext,
        url: format!("{}{}", base_url, data.permalink),
        score: data.score,
        upvote_ratio: data.upvote_ratio,
        reply_count: data.num_comments,
        posted_at: timestamp_from_epoch(data.created_utc),
    })
}

/// Flattens a reply tree in depth-first order without recursion.
///
/// Reply ids carry a type prefix in parent links: `t1_` means another
/// reply, `t3_` means the item itself (a top-level reply, stored with no
/// parent). Non-reply nodes such as pagination stubs are skipped.
fn flatten_reply_tree(children: Vec<Thing>) -> Vec<PlatformReply> {
    let mut out = Vec::new();
    let mut stack: Vec<(Thing, i32)> = Vec::new();

    for thing in children.into_iter().rev() {
        stack.push((thing, 0));
    }

    while let Some((thing, depth)) = stack.pop() {
        if thing.kind != "t1" {
            continue;
        }

        let data: ReplyData = match serde_json::from_value(thing.data) {
            Ok(d) => d,
            Err(e) => {
                log_warn!("Skipping malformed reply: {}", e);
                continue;
            }
        };

        let parent_id = data
            .parent_id
            .strip_prefix("t1_")
            .map(|id| id.to_string());

        let nested = match data.replies {
            Some(Replies::Listing(listing)) => listing.data.children,
            _ => Vec::new(),
        };

        out.push(PlatformReply {
            id: data.id,
            author: data.author,
            content: data.body,
            score: data.score,
            parent_id,
            depth,
            posted_at: timestamp_from_epoch(data.created_utc),
        });

        for child in nested.into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    out
}

fn timestamp_from_epoch(epoch: f64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch as i64, 0).unwrap_or_else(Utc::now)
}
