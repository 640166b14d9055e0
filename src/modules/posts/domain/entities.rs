/// Domain entities for ingested forum content
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level submission ingested from a feed.
///
/// Tracking fields (`track_enabled`, `track_until`) are written once at
/// ingestion by the tracking decision engine; rescrape bookkeeping
/// (`last_rescrape_at`, `rescrape_count`) is written by the follow-up
/// execution path. No other component touches these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub feed: String,
    pub title: String,
    pub author: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub score: i32,
    pub upvote_ratio: Option<f64>,
    pub reply_count: i32,
    /// Snapshot of the reply count at first ingestion
    pub initial_reply_count: i32,
    pub mentioned_tickers: Vec<String>,
    pub primary_ticker: Option<String>,
    pub is_relevant: bool,
    pub track_enabled: bool,
    pub track_until: Option<DateTime<Utc>>,
    pub last_rescrape_at: Option<DateTime<Utc>>,
    pub rescrape_count: i32,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A threaded reply to a post (or to another reply).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author: Option<String>,
    pub content: String,
    pub score: i32,
    pub mentioned_tickers: Vec<String>,
    /// Id of the parent comment; None for top-level replies
    pub parent_id: Option<String>,
    pub depth: i32,
    pub is_relevant: bool,
    pub posted_at: DateTime<Utc>,
}

/// Fresh engagement numbers fetched during a rescrape
#[derive(Debug, Clone, Copy)]
pub struct EngagementSnapshot {
    pub score: i32,
    pub upvote_ratio: Option<f64>,
    pub reply_count: i32,
}
