/// Diesel-based implementation of PostRepository
use crate::modules::posts::domain::entities::{Comment, EngagementSnapshot, Post};
use crate::modules::posts::domain::repository::PostRepository;
use crate::modules::posts::domain::tracking::RESCRAPE_INTERVAL_MINUTES;
use crate::modules::posts::infrastructure::models::{CommentModel, PostModel};
use crate::schema::{comments, posts};
use crate::shared::database::DbPool;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

pub struct PostRepositoryImpl {
    pool: DbPool,
}

impl PostRepositoryImpl {
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
impl PostRepository for PostRepositoryImpl {
    async fn insert_post(&self, post: &Post) -> AppResult<bool> {
        let mut conn = self.get_conn()?;

        // Idempotent: re-ingesting an id already stored is a no-op
        let inserted = diesel::insert_into(posts::table)
            .values(PostModel::from_domain(post))
            .on_conflict(posts::id)
            .do_nothing()
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert post: {}", e)))?;

        Ok(inserted > 0)
    }

    async fn get_by_id(&self, post_id: &str) -> AppResult<Option<Post>> {
        let mut conn = self.get_conn()?;

        let post: Option<PostModel> = posts::table
            .find(post_id)
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get post by id: {}", e)))?;

        Ok(post.map(|p| p.to_domain()))
    }

    async fn insert_new_comments(&self, new_comments: &[Comment]) -> AppResult<usize> {
        if new_comments.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn()?;

        let models: Vec<CommentModel> =
            new_comments.iter().map(CommentModel::from_domain).collect();

        // Only rows with unseen ids are inserted; the affected-row count is
        // therefore the number of genuinely new comments.
        let inserted = diesel::insert_into(comments::table)
            .values(&models)
            .on_conflict(comments::id)
            .do_nothing()
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert comments: {}", e)))?;

        Ok(inserted)
    }

    async fn find_rescrape_candidates(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Post>> {
        let mut conn = self.get_conn()?;

        let cutoff = now - chrono::Duration::minutes(RESCRAPE_INTERVAL_MINUTES);

        let models: Vec<PostModel> = posts::table
            .filter(posts::track_enabled.eq(true))
            .filter(posts::track_until.gt(now))
            .filter(
                posts::last_rescrape_at
                    .is_null()
                    .or(posts::last_rescrape_at.lt(cutoff)),
            )
            .order(posts::posted_at.desc())
            .limit(limit)
            .load(&mut conn)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to scan rescrape candidates: {}", e))
            })?;

        Ok(models.into_iter().map(|m| m.to_domain()).collect())
    }

    async fn record_rescrape(
        &self,
        post_id: &str,
        snapshot: EngagementSnapshot,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::update(posts::table.find(post_id))
            .set((
                posts::score.eq(snapshot.score),
                posts::upvote_ratio.eq(snapshot.upvote_ratio),
                posts::reply_count.eq(snapshot.reply_count),
                posts::last_rescrape_at.eq(Some(now)),
                posts::rescrape_count.eq(posts::rescrape_count + 1),
            ))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to record rescrape: {}", e)))?;

        Ok(())
    }

    async fn recent_posts(&self, window_hours: i64) -> AppResult<Vec<Post>> {
        let mut conn = self.get_conn()?;

        let cutoff = Utc::now() - chrono::Duration::hours(window_hours);

        let models: Vec<PostModel> = posts::table
            .filter(posts::posted_at.gt(cutoff))
            .order(posts::posted_at.desc())
            .load(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to load recent posts: {}", e)))?;

        Ok(models.into_iter().map(|m| m.to_domain()).collect())
    }
}
