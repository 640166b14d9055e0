/// Domain entities for the scrape job queue
///
/// Jobs represent units of scheduled scrape work: periodic batch scrapes
/// over source feeds and follow-up comment rescrapes for tracked posts.
use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority convention for the queue (lower number = more urgent).
pub mod priority {
    /// Manually triggered batch scrape.
    pub const MANUAL: i32 = 1;
    /// Scheduler-created batch scrape.
    pub const SCHEDULED: i32 = 5;
    /// Comment rescrape for a post less than a day old.
    pub const RESCRAPE_FRESH: i32 = 20;
    /// Comment rescrape for an older tracked post.
    pub const RESCRAPE_STALE: i32 = 50;
    /// User-requested rescrape of a single post.
    pub const RESCRAPE_MANUAL: i32 = 100;
}

/// Job status enum matching database type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

/// Wire config for batch scrape jobs: `{"feeds": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedBatchConfig {
    pub feeds: Vec<String>,
}

/// Wire config for single-post follow-up jobs: `{"post_id": "...", "feed": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescrapeConfig {
    pub post_id: String,
    pub feed: String,
}

/// Typed job payload, one variant per job type.
///
/// The JSON config blob only exists at the storage boundary; everything in
/// memory dispatches on this enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSpec {
    ScheduledScrape { feeds: Vec<String> },
    TargetedScrape { feeds: Vec<String> },
    CommentRescrape { post_id: String, feed: String },
}

impl JobSpec {
    pub const SCHEDULED_SCRAPE: &'static str = "scheduled_scrape";
    pub const TARGETED_SCRAPE: &'static str = "targeted_scrape";
    pub const COMMENT_RESCRAPE: &'static str = "comment_rescrape";

    /// Storage name for this job type
    pub fn job_type(&self) -> &'static str {
        match self {
            JobSpec::ScheduledScrape { .. } => Self::SCHEDULED_SCRAPE,
            JobSpec::TargetedScrape { .. } => Self::TARGETED_SCRAPE,
            JobSpec::CommentRescrape { .. } => Self::COMMENT_RESCRAPE,
        }
    }

    /// Serialize the variant's config for storage
    pub fn config_json(&self) -> serde_json::Value {
        match self {
            JobSpec::ScheduledScrape { feeds } | JobSpec::TargetedScrape { feeds } => {
                serde_json::json!(FeedBatchConfig {
                    feeds: feeds.clone()
                })
            }
            JobSpec::CommentRescrape { post_id, feed } => serde_json::json!(RescrapeConfig {
                post_id: post_id.clone(),
                feed: feed.clone(),
            }),
        }
    }

    /// Reconstruct the typed spec from stored columns.
    ///
    /// A malformed config is a ConfigError; the worker fails the job
    /// immediately without retrying.
    pub fn from_parts(job_type: &str, config: &serde_json::Value) -> AppResult<Self> {
        match job_type {
            Self::SCHEDULED_SCRAPE => {
                let parsed: FeedBatchConfig = serde_json::from_value(config.clone())
                    .map_err(|e| AppError::ConfigError(format!("Invalid batch config: {}", e)))?;
                Ok(JobSpec::ScheduledScrape {
                    feeds: parsed.feeds,
                })
            }
            Self::TARGETED_SCRAPE => {
                let parsed: FeedBatchConfig = serde_json::from_value(config.clone())
                    .map_err(|e| AppError::ConfigError(format!("Invalid batch config: {}", e)))?;
                Ok(JobSpec::TargetedScrape {
                    feeds: parsed.feeds,
                })
            }
            Self::COMMENT_RESCRAPE => {
                let parsed: RescrapeConfig = serde_json::from_value(config.clone()).map_err(
                    |e| AppError::ConfigError(format!("Invalid rescrape config: {}", e)),
                )?;
                Ok(JobSpec::CommentRescrape {
                    post_id: parsed.post_id,
                    feed: parsed.feed,
                })
            }
            other => Err(AppError::ConfigError(format!(
                "Unknown job type: {}",
                other
            ))),
        }
    }
}

/// New job to be queued (before insertion to database)
#[derive(Debug, Clone)]
pub struct Job {
    pub spec: JobSpec,
    pub priority: i32,
}

impl Job {
    /// Scheduler-created batch scrape over all active feeds
    pub fn scheduled(feeds: Vec<String>) -> Self {
        Self {
            spec: JobSpec::ScheduledScrape { feeds },
            priority: priority::SCHEDULED,
        }
    }

    /// Manually triggered batch scrape, picked up on the next poll
    pub fn manual(feeds: Vec<String>) -> Self {
        Self {
            spec: JobSpec::ScheduledScrape { feeds },
            priority: priority::MANUAL,
        }
    }

    /// Targeted scrape of a caller-chosen feed list
    pub fn targeted(feeds: Vec<String>, priority: i32) -> Self {
        Self {
            spec: JobSpec::TargetedScrape { feeds },
            priority,
        }
    }

    /// Follow-up comment rescrape for a tracked post
    pub fn rescrape(post_id: String, feed: String, priority: i32) -> Self {
        Self {
            spec: JobSpec::CommentRescrape { post_id, feed },
            priority,
        }
    }
}

/// Job record from database (with metadata)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub job_type: String,
    pub config: serde_json::Value,
    pub priority: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub items_collected: i32,
    pub errors_count: i32,
    pub error_message: Option<String>,
}

impl JobRecord {
    /// Parse job status
    pub fn parse_status(&self) -> Result<JobStatus, String> {
        self.status.parse()
    }

    /// Parse the typed job spec from the stored type + config columns
    pub fn parse_spec(&self) -> AppResult<JobSpec> {
        JobSpec::from_parts(&self.job_type, &self.config)
    }
}
