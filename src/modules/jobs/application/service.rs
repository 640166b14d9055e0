/// Application service for queueing and inspecting scrape jobs
///
/// Sits between the outer surfaces (CLI bins, future API) and the queue
/// repository. Enforces the dedup rules: at most one in-flight batch scrape,
/// at most one in-flight rescrape per post.
use crate::modules::feeds::domain::repository::FeedRepository;
use crate::modules::jobs::domain::entities::{priority, Job, JobRecord, JobSpec, JobStatus};
use crate::modules::jobs::domain::repository::{JobRepository, JobStatistics};
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info};
use std::sync::Arc;
use uuid::Uuid;

pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    feeds: Arc<dyn FeedRepository>,
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobRepository>, feeds: Arc<dyn FeedRepository>) -> Self {
        Self { jobs, feeds }
    }

    /// Queues a manual batch scrape over every active feed.
    ///
    /// Refused with Conflict while another batch scrape is pending or
    /// processing, and with NotFound when no feeds are active.
    pub async fn trigger_batch_scrape(&self) -> AppResult<JobRecord> {
        let feeds = self.feeds.active_feeds().await?;
        if feeds.is_empty() {
            return Err(AppError::NotFound(
                "No active feeds configured".to_string(),
            ));
        }

        if self.jobs.has_active_of_type(JobSpec::SCHEDULED_SCRAPE).await? {
            return Err(AppError::Conflict(
                "A batch scrape is already queued or running".to_string(),
            ));
        }

        let names = feeds.into_iter().map(|f| f.name).collect();
        let record = self.jobs.enqueue(Job::manual(names)).await?;
        log_info!("Queued manual batch scrape {}", record.id);
        Ok(record)
    }

    /// Queues a caller-built job after validating its payload.
    pub async fn create_job(&self, spec: JobSpec, priority: i32) -> AppResult<JobRecord> {
        match &spec {
            JobSpec::ScheduledScrape { feeds } | JobSpec::TargetedScrape { feeds } => {
                if feeds.is_empty() {
                    return Err(AppError::InvalidInput(
                        "At least one feed is required".to_string(),
                    ));
                }
            }
            JobSpec::CommentRescrape { post_id, .. } => {
                if post_id.is_empty() {
                    return Err(AppError::InvalidInput(
                        "A post id is required".to_string(),
                    ));
                }
            }
        }

        let record = self.jobs.enqueue(Job { spec, priority }).await?;
        log_info!("Queued {} job {}", record.job_type, record.id);
        Ok(record)
    }

    /// Queues a scrape over a caller-chosen feed list.
    pub async fn trigger_targeted_scrape(&self, feeds: Vec<String>) -> AppResult<JobRecord> {
        self.create_job(JobSpec::TargetedScrape { feeds }, priority::MANUAL)
            .await
    }

    /// Queues a user-requested comment rescrape for one post.
    ///
    /// Refused with Conflict when a rescrape for the same post is already
    /// pending or processing.
    pub async fn trigger_post_rescrape(&self, post_id: &str, feed: &str) -> AppResult<JobRecord> {
        if let Some(existing) = self
            .jobs
            .find_duplicate_pending(JobSpec::COMMENT_RESCRAPE, post_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Rescrape for post {} already queued as job {}",
                post_id, existing.id
            )));
        }

        let record = self
            .jobs
            .enqueue(Job::rescrape(
                post_id.to_string(),
                feed.to_string(),
                priority::RESCRAPE_MANUAL,
            ))
            .await?;
        log_debug!("Queued rescrape {} for post {}", record.id, post_id);
        Ok(record)
    }

    pub async fn get_job(&self, job_id: Uuid) -> AppResult<JobRecord> {
        self.jobs
            .get_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))
    }

    pub async fn list_jobs(
        &self,
        status: Option<JobStatus>,
        limit: i64,
    ) -> AppResult<Vec<JobRecord>> {
        self.jobs.list_recent(status, limit).await
    }

    pub async fn statistics(&self) -> AppResult<JobStatistics> {
        self.jobs.get_statistics().await
    }

    /// Drops completed and failed jobs older than the given number of days.
    pub async fn cleanup(&self, days: i32) -> AppResult<usize> {
        let deleted = self.jobs.delete_old_completed(days).await?;
        if deleted > 0 {
            log_info!("Deleted {} finished jobs older than {} days", deleted, days);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::feeds::domain::entities::{Feed, ScrapeSort};
    use crate::modules::feeds::domain::repository::MockFeedRepository;
    use crate::modules::jobs::domain::repository::MockJobRepository;
    use chrono::Utc;

    fn feed(name: &str) -> Feed {
        Feed {
            id: 1,
            name: name.to_string(),
            is_active: true,
            last_scraped_at: None,
            scrape_sort: ScrapeSort::Hot,
            scrape_time_filter: None,
            scrape_limit: 25,
            lookback_days: 7,
            created_at: Utc::now(),
        }
    }

    fn record(job: &Job) -> JobRecord {
        JobRecord {
            id: Uuid::new_v4(),
            job_type: job.spec.job_type().to_string(),
            config: job.spec.config_json(),
            priority: job.priority,
            status: "pending".to_string(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            items_collected: 0,
            errors_count: 0,
            error_message: None,
        }
    }

    #[tokio::test]
    async fn batch_scrape_requires_active_feeds() {
        let mut feeds = MockFeedRepository::new();
        feeds.expect_active_feeds().returning(|| Ok(vec![]));

        let service = JobService::new(
            Arc::new(MockJobRepository::new()),
            Arc::new(feeds),
        );

        let err = service.trigger_batch_scrape().await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn batch_scrape_is_refused_while_one_is_in_flight() {
        let mut feeds = MockFeedRepository::new();
        feeds
            .expect_active_feeds()
            .returning(|| Ok(vec![feed("stocks")]));

        let mut jobs = MockJobRepository::new();
        jobs.expect_has_active_of_type().returning(|_| Ok(true));

        let service = JobService::new(Arc::new(jobs), Arc::new(feeds));

        let err = service.trigger_batch_scrape().await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn batch_scrape_enqueues_manual_priority_over_all_feeds() {
        let mut feeds = MockFeedRepository::new();
        feeds
            .expect_active_feeds()
            .returning(|| Ok(vec![feed("stocks"), feed("investing")]));

        let mut jobs = MockJobRepository::new();
        jobs.expect_has_active_of_type().returning(|_| Ok(false));
        jobs.expect_enqueue()
            .withf(|job| {
                job.priority == priority::MANUAL
                    && matches!(
                        &job.spec,
                        JobSpec::ScheduledScrape { feeds } if feeds.len() == 2
                    )
            })
            .returning(|job| Ok(record(&job)));

        let service = JobService::new(Arc::new(jobs), Arc::new(feeds));
        let queued = service.trigger_batch_scrape().await.unwrap();
        assert_eq!(queued.priority, priority::MANUAL);
    }

    #[tokio::test]
    async fn post_rescrape_dedups_against_in_flight_job() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_duplicate_pending()
            .withf(|job_type, post_id| {
                job_type == JobSpec::COMMENT_RESCRAPE && post_id == "abc"
            })
            .returning(|_, _| {
                let job = Job::rescrape("abc".to_string(), "stocks".to_string(), 100);
                Ok(Some(record(&job)))
            });

        let service = JobService::new(Arc::new(jobs), Arc::new(MockFeedRepository::new()));

        let err = service.trigger_post_rescrape("abc", "stocks").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn post_rescrape_uses_lowest_urgency_priority() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_duplicate_pending().returning(|_, _| Ok(None));
        jobs.expect_enqueue()
            .withf(|job| job.priority == priority::RESCRAPE_MANUAL)
            .returning(|job| Ok(record(&job)));

        let service = JobService::new(Arc::new(jobs), Arc::new(MockFeedRepository::new()));
        let queued = service.trigger_post_rescrape("xyz", "stocks").await.unwrap();
        assert_eq!(queued.priority, priority::RESCRAPE_MANUAL);
    }

    #[tokio::test]
    async fn targeted_scrape_rejects_empty_feed_list() {
        let service = JobService::new(
            Arc::new(MockJobRepository::new()),
            Arc::new(MockFeedRepository::new()),
        );

        let err = service.trigger_targeted_scrape(vec![]).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
