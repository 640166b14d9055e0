use crate::modules::runs::domain::entities::Run;
use crate::schema::scraper_runs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Insertable, Debug)]
#[diesel(table_name = scraper_runs)]
pub struct NewRun<'a> {
    pub run_type: &'a str,
    pub status: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = scraper_runs)]
pub struct RunModel {
    pub id: Uuid,
    pub run_type: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub items_collected: i32,
    pub comments_collected: i32,
    pub errors_count: i32,
    pub error_message: Option<String>,
}

impl RunModel {
    pub fn to_domain(self) -> Run {
        Run {
            id: self.id,
            run_type: self.run_type,
            status: self.status,
            started_at: self.started_at,
            completed_at: self.completed_at,
            duration_seconds: self.duration_seconds,
            items_collected: self.items_collected,
            comments_collected: self.comments_collected,
            errors_count: self.errors_count,
            error_message: self.error_message,
        }
    }
}
