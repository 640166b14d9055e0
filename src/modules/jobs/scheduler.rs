//! Periodic batch job scheduler
//!
//! Every interval, snapshots the active feed registry and queues a single
//! batch scrape covering all of it. The worker process does the actual
//! fetching; the scheduler only writes queue rows.

use crate::modules::feeds::domain::repository::FeedRepository;
use crate::modules::jobs::domain::entities::Job;
use crate::modules::jobs::domain::repository::JobRepository;
use crate::shared::config::SchedulerConfig;
use crate::shared::errors::AppResult;
use crate::{log_debug, log_error, log_info};
use std::sync::Arc;
use tokio::time::sleep;

pub struct Scheduler {
    config: SchedulerConfig,
    jobs: Arc<dyn JobRepository>,
    feeds: Arc<dyn FeedRepository>,
}

impl Scheduler {
    pub fn new(
        config: SchedulerConfig,
        jobs: Arc<dyn JobRepository>,
        feeds: Arc<dyn FeedRepository>,
    ) -> Self {
        Self {
            config,
            jobs,
            feeds,
        }
    }

    /// Runs forever, queueing one batch per interval. An error delays only
    /// until the retry sleep, never kills the loop.
    pub async fn run(&self) -> AppResult<()> {
        log_info!(
            "Scheduler started, batch interval {:?}",
            self.config.scrape_interval
        );

        loop {
            match self.tick().await {
                Ok(Some(count)) => {
                    log_info!("Queued scheduled batch over {} feeds", count);
                    sleep(self.config.scrape_interval).await;
                }
                Ok(None) => {
                    // Nothing registered; stay quiet and check next interval
                    sleep(self.config.scrape_interval).await;
                }
                Err(e) => {
                    log_error!("Scheduler tick failed: {}", e);
                    sleep(self.config.error_retry).await;
                }
            }
        }
    }

    /// One scheduling pass. Returns the number of feeds covered, or None
    /// when no feeds are active and no job was queued.
    pub async fn tick(&self) -> AppResult<Option<usize>> {
        let feeds = self.feeds.active_feeds().await?;
        if feeds.is_empty() {
            log_debug!("No active feeds, skipping scheduled batch");
            return Ok(None);
        }

        let names: Vec<String> = feeds.into_iter().map(|f| f.name).collect();
        let count = names.len();
        self.jobs.enqueue(Job::scheduled(names)).await?;

        Ok(Some(count))
    }
}
