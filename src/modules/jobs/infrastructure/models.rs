/// Diesel models for scrape_jobs table
use crate::modules::jobs::domain::value_objects::JobStatusDb;
use crate::schema::scrape_jobs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Diesel model for inserting new jobs
#[derive(Insertable, Debug)]
#[diesel(table_name = scrape_jobs)]
pub struct NewJob {
    pub job_type: String,
    pub config: JsonValue,
    pub priority: i32,
}

/// Diesel model for querying existing jobs
#[derive(Queryable, Selectable, QueryableByName, Debug, Clone)]
#[diesel(table_name = scrape_jobs)]
pub struct ScrapeJobModel {
    pub id: Uuid,
    pub job_type: String,
    pub config: JsonValue,
    pub priority: i32,
    pub status: JobStatusDb,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub items_collected: i32,
    pub errors_count: i32,
    pub error_message: Option<String>,
}

impl ScrapeJobModel {
    /// Convert to domain JobRecord
    pub fn to_job_record(self) -> crate::modules::jobs::domain::entities::JobRecord {
        crate::modules::jobs::domain::entities::JobRecord {
            id: self.id,
            job_type: self.job_type,
            config: self.config,
            priority: self.priority,
            status: self.status.to_string(),
            created_at: self.created_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
            items_collected: self.items_collected,
            errors_count: self.errors_count,
            error_message: self.error_message,
        }
    }
}
