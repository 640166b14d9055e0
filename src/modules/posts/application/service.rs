/// Application service over stored posts
///
/// Read-side operations: heat-ranked views of recent posts and single-post
/// lookups. Heat is computed here at query time, never stored.
use crate::modules::posts::domain::entities::Post;
use crate::modules::posts::domain::heat::{rank_posts, HeatInput, HeatScore};
use crate::modules::posts::domain::repository::PostRepository;
use crate::shared::errors::{AppError, AppResult};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Default candidate window for the hot view, in hours.
const HOT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize)]
pub struct RankedPost {
    pub post: Post,
    pub heat: f64,
    pub recency_score: f64,
    pub engagement_score: f64,
    pub ticker_bonus: f64,
}

impl RankedPost {
    fn new(post: Post, score: HeatScore) -> Self {
        Self {
            post,
            heat: score.heat,
            recency_score: score.recency_score,
            engagement_score: score.engagement_score,
            ticker_bonus: score.ticker_bonus,
        }
    }
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Posts from the last 24 hours ranked by heat, hottest first.
    pub async fn hot_posts(&self, limit: usize) -> AppResult<Vec<RankedPost>> {
        let candidates = self.posts.recent_posts(HOT_WINDOW_HOURS).await?;
        let now = Utc::now();

        let ranked = rank_posts(candidates, now, |post| HeatInput {
            posted_at: post.posted_at,
            score: post.score,
            reply_count: post.reply_count,
            has_mentions: !post.mentioned_tickers.is_empty(),
            has_primary_ticker: post.primary_ticker.is_some(),
        });

        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(post, score)| RankedPost::new(post, score))
            .collect())
    }

    pub async fn get_post(&self, post_id: &str) -> AppResult<Post> {
        self.posts
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }
}
