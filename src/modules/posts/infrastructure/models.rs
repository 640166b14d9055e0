/// Diesel models for posts and comments tables
use crate::modules::posts::domain::entities::{Comment, Post};
use crate::schema::{comments, posts};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Queryable, Selectable, QueryableByName, Insertable, Debug, Clone)]
#[diesel(table_name = posts)]
pub struct PostModel {
    pub id: String,
    pub feed: String,
    pub title: String,
    pub author: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub score: i32,
    pub upvote_ratio: Option<f64>,
    pub reply_count: i32,
    pub initial_reply_count: i32,
    pub mentioned_tickers: JsonValue,
    pub primary_ticker: Option<String>,
    pub is_relevant: bool,
    pub track_enabled: bool,
    pub track_until: Option<DateTime<Utc>>,
    pub last_rescrape_at: Option<DateTime<Utc>>,
    pub rescrape_count: i32,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PostModel {
    pub fn from_domain(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            feed: post.feed.clone(),
            title: post.title.clone(),
            author: post.author.clone(),
            content: post.content.clone(),
            url: post.url.clone(),
            score: post.score,
            upvote_ratio: post.upvote_ratio,
            reply_count: post.reply_count,
            initial_reply_count: post.initial_reply_count,
            mentioned_tickers: serde_json::json!(post.mentioned_tickers),
            primary_ticker: post.primary_ticker.clone(),
            is_relevant: post.is_relevant,
            track_enabled: post.track_enabled,
            track_until: post.track_until,
            last_rescrape_at: post.last_rescrape_at,
            rescrape_count: post.rescrape_count,
            posted_at: post.posted_at,
            created_at: post.created_at,
        }
    }

    pub fn to_domain(self) -> Post {
        Post {
            id: self.id,
            feed: self.feed,
            title: self.title,
            author: self.author,
            content: self.content,
            url: self.url,
            score: self.score,
            upvote_ratio: self.upvote_ratio,
            reply_count: self.reply_count,
            initial_reply_count: self.initial_reply_count,
            mentioned_tickers: tickers_from_json(&self.mentioned_tickers),
            primary_ticker: self.primary_ticker,
            is_relevant: self.is_relevant,
            track_enabled: self.track_enabled,
            track_until: self.track_until,
            last_rescrape_at: self.last_rescrape_at,
            rescrape_count: self.rescrape_count,
            posted_at: self.posted_at,
            created_at: self.created_at,
        }
    }
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = comments)]
pub struct CommentModel {
    pub id: String,
    pub post_id: String,
    pub author: Option<String>,
    pub content: String,
    pub score: i32,
    pub mentioned_tickers: JsonValue,
    pub parent_id: Option<String>,
    pub depth: i32,
    pub is_relevant: bool,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl CommentModel {
    pub fn from_domain(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            post_id: comment.post_id.clone(),
            author: comment.author.clone(),
            content: comment.content.clone(),
            score: comment.score,
            mentioned_tickers: serde_json::json!(comment.mentioned_tickers),
            parent_id: comment.parent_id.clone(),
            depth: comment.depth,
            is_relevant: comment.is_relevant,
            posted_at: comment.posted_at,
            created_at: Utc::now(),
        }
    }
}

fn tickers_from_json(value: &JsonValue) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}
