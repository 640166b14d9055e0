//! In-process status fan-out for worker progress
//!
//! Events go out on a broadcast channel for live subscribers and into a
//! bounded history buffer so late consumers can catch up on the recent past.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

const HISTORY_CAPACITY: usize = 100;
const HISTORY_EXPIRY_MINUTES: i64 = 60;
const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusEvent {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_collected: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors_count: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl StatusEvent {
    pub fn new(status: &str, message: String) -> Self {
        Self {
            status: status.to_string(),
            message,
            job_id: None,
            percentage: None,
            items_collected: None,
            errors_count: None,
            timestamp: Utc::now(),
        }
    }

    pub fn for_job(mut self, job_id: Uuid) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn with_progress(mut self, percentage: u8) -> Self {
        self.percentage = Some(percentage.min(100));
        self
    }

    pub fn with_counts(mut self, items_collected: i32, errors_count: i32) -> Self {
        self.items_collected = Some(items_collected);
        self.errors_count = Some(errors_count);
        self
    }
}

pub struct StatusBroadcaster {
    sender: broadcast::Sender<StatusEvent>,
    history: Mutex<VecDeque<StatusEvent>>,
}

impl StatusBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            history: Mutex::new(VecDeque::with_capacity(HISTORY_CAPACITY)),
        }
    }

    /// Publishes an event to live subscribers and records it in history.
    /// Publishing never fails; with no subscribers the event is only recorded.
    pub fn publish(&self, event: StatusEvent) {
        if let Ok(mut history) = self.history.lock() {
            if history.len() == HISTORY_CAPACITY {
                history.pop_back();
            }
            history.push_front(event.clone());
        }

        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.sender.subscribe()
    }

    /// Up to `limit` recent events, newest first. Entries older than an
    /// hour are dropped.
    pub fn history(&self, limit: usize) -> Vec<StatusEvent> {
        let cutoff = Utc::now() - Duration::minutes(HISTORY_EXPIRY_MINUTES);

        match self.history.lock() {
            Ok(mut history) => {
                while history
                    .back()
                    .map(|e| e.timestamp < cutoff)
                    .unwrap_or(false)
                {
                    history.pop_back();
                }
                history.iter().take(limit).cloned().collect()
            }
            Err(_) => Vec::new(),
        }
    }
}

impl Default for StatusBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
