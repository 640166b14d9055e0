/// Diesel models for feeds and feed_ticker_mappings tables
use crate::modules::feeds::domain::entities::Feed;
use crate::schema::{feed_ticker_mappings, feeds};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = feeds)]
pub struct FeedModel {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub scrape_sort: String,
    pub scrape_time_filter: Option<String>,
    pub scrape_limit: i32,
    pub lookback_days: i32,
    pub created_at: DateTime<Utc>,
}

impl FeedModel {
    pub fn to_domain(self) -> Feed {
        Feed {
            id: self.id,
            name: self.name,
            is_active: self.is_active,
            last_scraped_at: self.last_scraped_at,
            // Unknown stored sort falls back to hot
            scrape_sort: self.scrape_sort.parse().unwrap_or_default(),
            scrape_time_filter: self.scrape_time_filter,
            scrape_limit: self.scrape_limit,
            lookback_days: self.lookback_days,
            created_at: self.created_at,
        }
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = feed_ticker_mappings)]
pub struct FeedTickerMappingModel {
    pub id: i32,
    pub ticker_symbol: String,
    pub feed_id: i32,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}
