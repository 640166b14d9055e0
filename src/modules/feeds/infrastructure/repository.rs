/// Diesel-based implementation of FeedRepository
use crate::modules::feeds::domain::entities::Feed;
use crate::modules::feeds::domain::repository::FeedRepository;
use crate::modules::feeds::infrastructure::models::FeedModel;
use crate::schema::{feed_ticker_mappings, feeds};
use crate::shared::database::DbPool;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::HashMap;

pub struct FeedRepositoryImpl {
    pool: DbPool,
}

impl FeedRepositoryImpl {
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
impl FeedRepository for FeedRepositoryImpl {
    async fn active_feeds(&self) -> AppResult<Vec<Feed>> {
        let mut conn = self.get_conn()?;

        let models: Vec<FeedModel> = feeds::table
            .filter(feeds::is_active.eq(true))
            .order(feeds::name.asc())
            .load(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to load active feeds: {}", e)))?;

        Ok(models.into_iter().map(|m| m.to_domain()).collect())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Feed>> {
        let mut conn = self.get_conn()?;

        let model: Option<FeedModel> = feeds::table
            .filter(feeds::name.eq(name))
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to find feed: {}", e)))?;

        Ok(model.map(|m| m.to_domain()))
    }

    async fn touch_last_scraped(&self, feed_id: i32) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::update(feeds::table.find(feed_id))
            .set(feeds::last_scraped_at.eq(diesel::dsl::now))
            .execute(&mut conn)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to update last_scraped_at: {}", e))
            })?;

        Ok(())
    }

    async fn ticker_map(&self) -> AppResult<HashMap<String, Vec<String>>> {
        let mut conn = self.get_conn()?;

        let rows: Vec<(String, String)> = feeds::table
            .inner_join(feed_ticker_mappings::table)
            .filter(feeds::is_active.eq(true))
            .select((feeds::name, feed_ticker_mappings::ticker_symbol))
            .load(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to load ticker map: {}", e)))?;

        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (feed_name, symbol) in rows {
            map.entry(feed_name).or_default().push(symbol);
        }

        Ok(map)
    }
}
