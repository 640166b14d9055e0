//! End-to-end worker behavior against mocked storage and platform.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use mockall::mock;
use mockall::predicate::eq;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use tickerwatch::modules::feeds::domain::entities::{Feed, ScrapeSort};
use tickerwatch::modules::feeds::domain::repository::FeedRepository;
use tickerwatch::modules::jobs::domain::entities::{priority, Job, JobRecord, JobStatus};
use tickerwatch::modules::jobs::domain::repository::{JobRepository, JobStatistics};
use tickerwatch::modules::jobs::worker::ScrapeWorker;
use tickerwatch::modules::platform::client::{PlatformClient, PlatformItem, PlatformReply};
use tickerwatch::modules::posts::domain::entities::{Comment, EngagementSnapshot, Post};
use tickerwatch::modules::posts::domain::repository::PostRepository;
use tickerwatch::modules::runs::domain::entities::{Run, RunTotals, RunType};
use tickerwatch::modules::runs::domain::repository::RunRepository;
use tickerwatch::modules::status::StatusBroadcaster;
use tickerwatch::shared::config::WorkerConfig;
use tickerwatch::shared::errors::AppResult;

mock! {
    pub Jobs {}

    #[async_trait]
    impl JobRepository for Jobs {
        async fn enqueue(&self, job: Job) -> AppResult<JobRecord>;
        async fn dequeue(&self) -> AppResult<Option<JobRecord>>;
        async fn mark_completed(
            &self,
            job_id: Uuid,
            items_collected: i32,
            errors_count: i32,
        ) -> AppResult<()>;
        async fn mark_failed(&self, job_id: Uuid, error: &str, errors_count: i32) -> AppResult<()>;
        async fn find_duplicate_pending(
            &self,
            job_type: &str,
            post_id: &str,
        ) -> AppResult<Option<JobRecord>>;
        async fn has_active_of_type(&self, job_type: &str) -> AppResult<bool>;
        async fn get_by_id(&self, job_id: Uuid) -> AppResult<Option<JobRecord>>;
        async fn list_recent(
            &self,
            status: Option<JobStatus>,
            limit: i64,
        ) -> AppResult<Vec<JobRecord>>;
        async fn delete_old_completed(&self, days: i32) -> AppResult<usize>;
        async fn get_statistics(&self) -> AppResult<JobStatistics>;
    }
}

mock! {
    pub Posts {}

    #[async_trait]
    impl PostRepository for Posts {
        async fn insert_post(&self, post: &Post) -> AppResult<bool>;
        async fn get_by_id(&self, post_id: &str) -> AppResult<Option<Post>>;
        async fn insert_new_comments(&self, comments: &[Comment]) -> AppResult<usize>;
        async fn find_rescrape_candidates(
            &self,
            now: DateTime<Utc>,
            limit: i64,
        ) -> AppResult<Vec<Post>>;
        async fn record_rescrape(
            &self,
            post_id: &str,
            snapshot: EngagementSnapshot,
            now: DateTime<Utc>,
        ) -> AppResult<()>;
        async fn recent_posts(&self, window_hours: i64) -> AppResult<Vec<Post>>;
    }
}

mock! {
    pub Feeds {}

    #[async_trait]
    impl FeedRepository for Feeds {
        async fn active_feeds(&self) -> AppResult<Vec<Feed>>;
        async fn find_by_name(&self, name: &str) -> AppResult<Option<Feed>>;
        async fn touch_last_scraped(&self, feed_id: i32) -> AppResult<()>;
        async fn ticker_map(&self) -> AppResult<HashMap<String, Vec<String>>>;
    }
}

mock! {
    pub Runs {}

    #[async_trait]
    impl RunRepository for Runs {
        async fn create(&self, run_type: RunType) -> AppResult<Uuid>;
        async fn complete(&self, run_id: Uuid, totals: RunTotals) -> AppResult<()>;
        async fn fail(&self, run_id: Uuid, error: &str, totals: RunTotals) -> AppResult<()>;
        async fn fail_stale(&self, threshold: Duration) -> AppResult<usize>;
        async fn list_recent(&self, limit: i64) -> AppResult<Vec<Run>>;
    }
}

mock! {
    pub Platform {}

    #[async_trait]
    impl PlatformClient for Platform {
        async fn list_items<'a>(
            &self,
            feed: &str,
            sort: ScrapeSort,
            time_filter: Option<&'a str>,
            limit: i32,
        ) -> AppResult<Vec<PlatformItem>>;
        async fn fetch_item(&self, feed: &str, item_id: &str) -> AppResult<PlatformItem>;
        async fn fetch_replies(&self, feed: &str, item_id: &str) -> AppResult<Vec<PlatformReply>>;
    }
}

fn fast_config() -> WorkerConfig {
    WorkerConfig {
        poll_interval: Duration::from_millis(1),
        item_delay: Duration::ZERO,
        stale_run_threshold: Duration::from_secs(1800),
        error_cooldown: Duration::from_millis(1),
    }
}

fn tracked_post(id: &str, posted_hours_ago: i64) -> Post {
    let posted_at = Utc::now() - ChronoDuration::hours(posted_hours_ago);
    Post {
        id: id.to_string(),
        feed: "stocks".to_string(),
        title: "Earnings thread".to_string(),
        author: Some("user".to_string()),
        content: Some("$AAPL beat expectations".to_string()),
        url: None,
        score: 42,
        upvote_ratio: Some(0.93),
        reply_count: 12,
        initial_reply_count: 3,
        mentioned_tickers: vec!["AAPL".to_string()],
        primary_ticker: Some("AAPL".to_string()),
        is_relevant: true,
        track_enabled: true,
        track_until: Some(Utc::now() + ChronoDuration::days(1)),
        last_rescrape_at: None,
        rescrape_count: 0,
        posted_at,
        created_at: posted_at,
    }
}

fn pending_record(job: &Job) -> JobRecord {
    JobRecord {
        id: Uuid::new_v4(),
        job_type: job.spec.job_type().to_string(),
        config: job.spec.config_json(),
        priority: job.priority,
        status: "processing".to_string(),
        created_at: Utc::now(),
        started_at: Some(Utc::now()),
        completed_at: None,
        items_collected: 0,
        errors_count: 0,
        error_message: None,
    }
}

fn reply(id: &str, content: &str) -> PlatformReply {
    PlatformReply {
        id: id.to_string(),
        author: "commenter".to_string(),
        content: content.to_string(),
        score: 2,
        parent_id: None,
        depth: 0,
        posted_at: Utc::now(),
    }
}

fn worker(
    jobs: MockJobs,
    posts: MockPosts,
    feeds: MockFeeds,
    runs: MockRuns,
    platform: MockPlatform,
) -> ScrapeWorker {
    ScrapeWorker::new(
        fast_config(),
        Arc::new(jobs),
        Arc::new(posts),
        Arc::new(feeds),
        Arc::new(runs),
        Arc::new(platform),
        Arc::new(StatusBroadcaster::new()),
    )
}

#[tokio::test]
async fn idle_iteration_does_nothing() {
    let mut jobs = MockJobs::new();
    jobs.expect_dequeue().returning(|| Ok(None));

    let mut posts = MockPosts::new();
    posts
        .expect_find_rescrape_candidates()
        .returning(|_, _| Ok(vec![]));

    let worker = worker(
        jobs,
        posts,
        MockFeeds::new(),
        MockRuns::new(),
        MockPlatform::new(),
    );

    assert!(!worker.run_iteration().await.unwrap());
}

#[tokio::test]
async fn due_posts_get_rescrape_jobs_with_age_tiered_priority() {
    let mut posts = MockPosts::new();
    posts
        .expect_find_rescrape_candidates()
        .returning(|_, _| Ok(vec![tracked_post("fresh1", 3), tracked_post("stale1", 30)]));

    let mut jobs = MockJobs::new();
    jobs.expect_find_duplicate_pending().returning(|_, _| Ok(None));
    jobs.expect_enqueue()
        .withf(|job| {
            matches!(
                &job.spec,
                tickerwatch::modules::jobs::JobSpec::CommentRescrape { post_id, .. }
                    if post_id == "fresh1"
            ) && job.priority == priority::RESCRAPE_FRESH
        })
        .times(1)
        .returning(|job| Ok(pending_record(&job)));
    jobs.expect_enqueue()
        .withf(|job| {
            matches!(
                &job.spec,
                tickerwatch::modules::jobs::JobSpec::CommentRescrape { post_id, .. }
                    if post_id == "stale1"
            ) && job.priority == priority::RESCRAPE_STALE
        })
        .times(1)
        .returning(|job| Ok(pending_record(&job)));
    jobs.expect_dequeue().returning(|| Ok(None));

    let worker = worker(
        jobs,
        posts,
        MockFeeds::new(),
        MockRuns::new(),
        MockPlatform::new(),
    );

    worker.run_iteration().await.unwrap();
}

#[tokio::test]
async fn posts_with_an_in_flight_rescrape_are_not_requeued() {
    let mut posts = MockPosts::new();
    posts
        .expect_find_rescrape_candidates()
        .returning(|_, _| Ok(vec![tracked_post("busy1", 2)]));

    let mut jobs = MockJobs::new();
    jobs.expect_find_duplicate_pending()
        .with(eq("comment_rescrape"), eq("busy1"))
        .returning(|_, post_id| {
            let job = Job::rescrape(post_id.to_string(), "stocks".to_string(), 20);
            Ok(Some(pending_record(&job)))
        });
    jobs.expect_enqueue().times(0);
    jobs.expect_dequeue().returning(|| Ok(None));

    let worker = worker(
        jobs,
        posts,
        MockFeeds::new(),
        MockRuns::new(),
        MockPlatform::new(),
    );

    worker.run_iteration().await.unwrap();
}

#[tokio::test]
async fn comment_rescrape_job_stores_new_comments_and_updates_snapshot() {
    let job = Job::rescrape("abc123".to_string(), "stocks".to_string(), 20);
    let record = pending_record(&job);
    let job_id = record.id;
    let run_id = Uuid::new_v4();

    let mut jobs = MockJobs::new();
    jobs.expect_dequeue().times(1).return_once(move || Ok(Some(record)));
    jobs.expect_mark_completed()
        .with(eq(job_id), eq(0), eq(0))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut posts = MockPosts::new();
    posts
        .expect_find_rescrape_candidates()
        .returning(|_, _| Ok(vec![]));
    posts
        .expect_get_by_id()
        .with(eq("abc123"))
        .returning(|_| Ok(Some(tracked_post("abc123", 2))));
    posts
        .expect_insert_new_comments()
        .withf(|comments| comments.len() == 2 && comments.iter().all(|c| c.post_id == "abc123"))
        .times(1)
        .returning(|_| Ok(2));
    posts
        .expect_record_rescrape()
        .withf(|post_id, snapshot, _| post_id == "abc123" && snapshot.reply_count == 25)
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut platform = MockPlatform::new();
    platform.expect_fetch_item().returning(|_, item_id| {
        Ok(PlatformItem {
            id: item_id.to_string(),
            feed: "stocks".to_string(),
            title: "Earnings thread".to_string(),
            author: "user".to_string(),
            content: "$AAPL".to_string(),
            url: "https://example.com/p".to_string(),
            score: 90,
            upvote_ratio: 0.95,
            reply_count: 25,
            posted_at: Utc::now() - ChronoDuration::hours(2),
        })
    });
    platform
        .expect_fetch_replies()
        .returning(|_, _| Ok(vec![reply("c1", "to the moon"), reply("c2", "$TSLA too")]));

    let mut runs = MockRuns::new();
    runs.expect_create()
        .with(eq(RunType::CommentRescrape))
        .times(1)
        .returning(move |_| Ok(run_id));
    runs.expect_complete()
        .withf(move |id, totals| *id == run_id && totals.comments_collected == 2)
        .times(1)
        .returning(|_, _| Ok(()));

    let worker = worker(jobs, posts, MockFeeds::new(), runs, platform);
    assert!(worker.run_iteration().await.unwrap());
}

#[tokio::test]
async fn malformed_job_config_fails_without_opening_a_run() {
    let record = JobRecord {
        id: Uuid::new_v4(),
        job_type: "comment_rescrape".to_string(),
        config: serde_json::json!({"feeds": ["stocks"]}),
        priority: 20,
        status: "processing".to_string(),
        created_at: Utc::now(),
        started_at: Some(Utc::now()),
        completed_at: None,
        items_collected: 0,
        errors_count: 0,
        error_message: None,
    };
    let job_id = record.id;

    let mut jobs = MockJobs::new();
    jobs.expect_dequeue().times(1).return_once(move || Ok(Some(record)));
    jobs.expect_mark_failed()
        .withf(move |id, _, _| *id == job_id)
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut posts = MockPosts::new();
    posts
        .expect_find_rescrape_candidates()
        .returning(|_, _| Ok(vec![]));

    let mut runs = MockRuns::new();
    runs.expect_create().times(0);

    let worker = worker(jobs, posts, MockFeeds::new(), runs, MockPlatform::new());
    assert!(worker.run_iteration().await.unwrap());
}

#[tokio::test]
async fn batch_scrape_skips_old_items_and_auto_tracks_fresh_ones() {
    let job = Job::scheduled(vec!["stocks".to_string()]);
    let record = pending_record(&job);
    let job_id = record.id;

    let fresh_item = PlatformItem {
        id: "fresh1".to_string(),
        feed: "stocks".to_string(),
        title: "DD on $AAPL".to_string(),
        author: "user".to_string(),
        content: "numbers inside".to_string(),
        url: "https://example.com/fresh1".to_string(),
        score: 10,
        upvote_ratio: 0.9,
        reply_count: 4,
        posted_at: Utc::now() - ChronoDuration::minutes(30),
    };
    let ancient_item = PlatformItem {
        id: "old1".to_string(),
        feed: "stocks".to_string(),
        title: "$TSLA thread from last month".to_string(),
        author: "user".to_string(),
        content: String::new(),
        url: "https://example.com/old1".to_string(),
        score: 500,
        upvote_ratio: 0.99,
        reply_count: 900,
        posted_at: Utc::now() - ChronoDuration::days(30),
    };

    let mut jobs = MockJobs::new();
    jobs.expect_dequeue().times(1).return_once(move || Ok(Some(record)));
    jobs.expect_mark_completed()
        .with(eq(job_id), eq(1), eq(0))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut posts = MockPosts::new();
    posts
        .expect_find_rescrape_candidates()
        .returning(|_, _| Ok(vec![]));
    posts
        .expect_insert_post()
        .withf(|post| {
            post.id == "fresh1"
                && post.mentioned_tickers == vec!["AAPL".to_string()]
                && post.track_enabled
                && post.track_until.is_some()
                && post.initial_reply_count == 4
        })
        .times(1)
        .returning(|_| Ok(true));
    posts
        .expect_insert_new_comments()
        .withf(|comments| comments.len() == 1 && comments[0].post_id == "fresh1")
        .times(1)
        .returning(|_| Ok(1));

    let mut feeds = MockFeeds::new();
    feeds.expect_ticker_map().returning(|| Ok(HashMap::new()));
    feeds.expect_find_by_name().returning(|name| {
        Ok(Some(Feed {
            id: 7,
            name: name.to_string(),
            is_active: true,
            last_scraped_at: None,
            scrape_sort: ScrapeSort::Hot,
            scrape_time_filter: None,
            scrape_limit: 25,
            lookback_days: 7,
            created_at: Utc::now(),
        }))
    });
    feeds
        .expect_touch_last_scraped()
        .with(eq(7))
        .times(1)
        .returning(|_| Ok(()));

    let mut platform = MockPlatform::new();
    platform
        .expect_list_items()
        .times(1)
        .return_once(move |_, _, _, _| Ok(vec![ancient_item, fresh_item]));
    platform
        .expect_fetch_replies()
        .with(eq("stocks"), eq("fresh1"))
        .times(1)
        .returning(|_, _| Ok(vec![reply("c1", "agreed on $AAPL")]));

    let mut runs = MockRuns::new();
    runs.expect_create().returning(|_| Ok(Uuid::new_v4()));
    runs.expect_complete()
        .withf(|_, totals| {
            totals.items_collected == 1
                && totals.comments_collected == 1
                && totals.errors_count == 0
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let worker = worker(jobs, posts, feeds, runs, platform);
    assert!(worker.run_iteration().await.unwrap());
}

#[tokio::test]
async fn failing_feed_is_counted_but_still_marked_scraped() {
    let job = Job::scheduled(vec!["stocks".to_string()]);
    let record = pending_record(&job);
    let job_id = record.id;

    let mut jobs = MockJobs::new();
    jobs.expect_dequeue().times(1).return_once(move || Ok(Some(record)));
    jobs.expect_mark_completed()
        .with(eq(job_id), eq(0), eq(1))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut posts = MockPosts::new();
    posts
        .expect_find_rescrape_candidates()
        .returning(|_, _| Ok(vec![]));

    let mut feeds = MockFeeds::new();
    feeds.expect_ticker_map().returning(|| Ok(HashMap::new()));
    feeds.expect_find_by_name().returning(|name| {
        Ok(Some(Feed {
            id: 7,
            name: name.to_string(),
            is_active: true,
            last_scraped_at: None,
            scrape_sort: ScrapeSort::Hot,
            scrape_time_filter: None,
            scrape_limit: 25,
            lookback_days: 7,
            created_at: Utc::now(),
        }))
    });
    feeds
        .expect_touch_last_scraped()
        .with(eq(7))
        .times(1)
        .returning(|_| Ok(()));

    let mut platform = MockPlatform::new();
    platform.expect_list_items().times(1).returning(|_, _, _, _| {
        Err(tickerwatch::shared::errors::AppError::ExternalServiceError(
            "listing unavailable".to_string(),
        ))
    });

    let mut runs = MockRuns::new();
    runs.expect_create().returning(|_| Ok(Uuid::new_v4()));
    runs.expect_complete()
        .withf(|_, totals| totals.errors_count == 1 && totals.items_collected == 0)
        .times(1)
        .returning(|_, _| Ok(()));

    let worker = worker(jobs, posts, feeds, runs, platform);
    assert!(worker.run_iteration().await.unwrap());
}

#[tokio::test]
async fn batch_job_counts_unregistered_feeds_as_errors() {
    let job = Job::scheduled(vec!["ghost".to_string()]);
    let record = pending_record(&job);
    let job_id = record.id;

    let mut jobs = MockJobs::new();
    jobs.expect_dequeue().times(1).return_once(move || Ok(Some(record)));
    jobs.expect_mark_completed()
        .with(eq(job_id), eq(0), eq(1))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut posts = MockPosts::new();
    posts
        .expect_find_rescrape_candidates()
        .returning(|_, _| Ok(vec![]));

    let mut feeds = MockFeeds::new();
    feeds.expect_ticker_map().returning(|| Ok(HashMap::new()));
    feeds
        .expect_find_by_name()
        .with(eq("ghost"))
        .returning(|_| Ok(None));

    let mut runs = MockRuns::new();
    runs.expect_create()
        .with(eq(RunType::ScheduledScrape))
        .returning(|_| Ok(Uuid::new_v4()));
    runs.expect_complete()
        .withf(|_, totals| totals.errors_count == 1 && totals.items_collected == 0)
        .times(1)
        .returning(|_, _| Ok(()));

    let worker = worker(jobs, posts, feeds, runs, MockPlatform::new());
    assert!(worker.run_iteration().await.unwrap());
}
