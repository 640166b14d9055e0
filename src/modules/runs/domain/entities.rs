use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// What kind of work a run covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunType {
    ScheduledScrape,
    TargetedScrape,
    CommentRescrape,
}

impl RunType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunType::ScheduledScrape => "scheduled_scrape",
            RunType::TargetedScrape => "targeted_scrape",
            RunType::CommentRescrape => "comment_rescrape",
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RunType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled_scrape" => Ok(RunType::ScheduledScrape),
            "targeted_scrape" => Ok(RunType::TargetedScrape),
            "comment_rescrape" => Ok(RunType::CommentRescrape),
            _ => Err(format!("Unknown run type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One execution of a scrape job, recorded for operational history.
#[derive(Debug, Clone)]
pub struct Run {
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

/// Counters accumulated over a run, written back when it finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunTotals {
    pub items_collected: i32,
    pub comments_collected: i32,
    pub errors_count: i32,
}
