//! Job execution loop
//!
//! Single consumer of the durable queue. Each iteration scans tracked posts
//! for due follow-ups, claims the highest-urgency pending job, and executes
//! it to a terminal status. Priority-1 manual jobs preempt everything else
//! at the next claim, which the poll interval bounds to a few seconds.

use crate::modules::feeds::domain::entities::Feed;
use crate::modules::feeds::domain::repository::FeedRepository;
use crate::modules::jobs::domain::entities::{Job, JobRecord, JobSpec};
use crate::modules::jobs::domain::repository::JobRepository;
use crate::modules::platform::client::{PlatformClient, PlatformItem, PlatformReply};
use crate::modules::posts::domain::entities::{Comment, EngagementSnapshot, Post};
use crate::modules::posts::domain::repository::PostRepository;
use crate::modules::posts::domain::tickers::extract_tickers;
use crate::modules::posts::domain::tracking::{
    decide_tracking, rescrape_priority, RESCRAPE_BATCH_LIMIT,
};
use crate::modules::runs::domain::entities::{RunTotals, RunType};
use crate::modules::runs::domain::repository::RunRepository;
use crate::modules::status::broadcaster::{StatusBroadcaster, StatusEvent};
use crate::shared::config::WorkerConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::RateLimiter;
use crate::{log_debug, log_error, log_info, log_warn};
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::sleep;

/// How many comments to store when a post is first ingested. The full tree
/// is only walked during follow-up rescrapes.
const INGEST_COMMENT_LIMIT: usize = 20;

pub struct ScrapeWorker {
    config: WorkerConfig,
    jobs: Arc<dyn JobRepository>,
    posts: Arc<dyn PostRepository>,
    feeds: Arc<dyn FeedRepository>,
    runs: Arc<dyn RunRepository>,
    platform: Arc<dyn PlatformClient>,
    status: Arc<StatusBroadcaster>,
    // Spaces out per-item comment fetches inside a batch
    item_pacer: RateLimiter,
}

impl ScrapeWorker {
    pub fn new(
        config: WorkerConfig,
        jobs: Arc<dyn JobRepository>,
        posts: Arc<dyn PostRepository>,
        feeds: Arc<dyn FeedRepository>,
        runs: Arc<dyn RunRepository>,
        platform: Arc<dyn PlatformClient>,
        status: Arc<StatusBroadcaster>,
    ) -> Self {
        let item_pacer = RateLimiter::from_interval(config.item_delay);
        Self {
            config,
            jobs,
            posts,
            feeds,
            runs,
            platform,
            status,
            item_pacer,
        }
    }

    /// Main loop. Sweeps abandoned runs once at startup, then polls forever.
    pub async fn run(&self) -> AppResult<()> {
        let swept = self.runs.fail_stale(self.config.stale_run_threshold).await?;
        if swept > 0 {
            log_warn!("Failed {} stale runs left by a previous worker", swept);
        }

        log_info!(
            "Worker ready, polling every {:?}",
            self.config.poll_interval
        );

        loop {
            match self.run_iteration().await {
                Ok(true) => {} // claimed and finished a job, check again immediately
                Ok(false) => sleep(self.config.poll_interval).await,
                Err(e) if e.is_storage_error() => {
                    log_error!(
                        "Storage error, cooling down for {:?}: {}",
                        self.config.error_cooldown,
                        e
                    );
                    sleep(self.config.error_cooldown).await;
                }
                Err(e) => {
                    log_error!("Iteration failed: {}", e);
                    sleep(self.config.poll_interval).await;
                }
            }
        }
    }

    /// One poll cycle: queue due follow-ups, then claim and execute at most
    /// one job. Returns whether a job was executed.
    pub async fn run_iteration(&self) -> AppResult<bool> {
        self.enqueue_due_rescrapes().await?;

        match self.jobs.dequeue().await? {
            Some(record) => {
                self.process_job(record).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Scans tracked posts and queues follow-up jobs for those due another
    /// comment pass. Skips posts that already have one in flight.
    async fn enqueue_due_rescrapes(&self) -> AppResult<usize> {
        let now = Utc::now();
        let candidates = self
            .posts
            .find_rescrape_candidates(now, RESCRAPE_BATCH_LIMIT)
            .await?;

        let mut queued = 0;
        for post in candidates {
            if self
                .jobs
                .find_duplicate_pending(JobSpec::COMMENT_RESCRAPE, &post.id)
                .await?
                .is_some()
            {
                continue;
            }

            let priority = rescrape_priority(post.posted_at, now);
            self.jobs
                .enqueue(Job::rescrape(post.id.clone(), post.feed.clone(), priority))
                .await?;
            queued += 1;
        }

        if queued > 0 {
            log_info!("Queued {} comment rescrape jobs", queued);
        }
        Ok(queued)
    }

    /// Executes one claimed job to a terminal status.
    ///
    /// A malformed config fails the job immediately without opening a run;
    /// there is nothing a retry could do differently.
    async fn process_job(&self, record: JobRecord) -> AppResult<()> {
        let spec = match record.parse_spec() {
            Ok(spec) => spec,
            Err(e) => {
                log_error!("Job {} has invalid config: {}", record.id, e);
                self.jobs
                    .mark_failed(record.id, &e.to_string(), 1)
                    .await?;
                self.status.publish(
                    StatusEvent::new("failed", format!("Job failed: {}", e)).for_job(record.id),
                );
                return Ok(());
            }
        };

        let run_type = match &spec {
            JobSpec::ScheduledScrape { .. } => RunType::ScheduledScrape,
            JobSpec::TargetedScrape { .. } => RunType::TargetedScrape,
            JobSpec::CommentRescrape { .. } => RunType::CommentRescrape,
        };
        let run_id = self.runs.create(run_type).await?;

        log_info!("Processing job {} ({})", record.id, spec.job_type());
        self.status.publish(
            StatusEvent::new("running", format!("Processing {} job", spec.job_type()))
                .for_job(record.id),
        );

        let outcome = match &spec {
            JobSpec::ScheduledScrape { feeds } | JobSpec::TargetedScrape { feeds } => {
                self.scrape_batch(feeds).await
            }
            JobSpec::CommentRescrape { post_id, feed } => {
                self.rescrape_comments(post_id, feed).await
            }
        };

        match outcome {
            Ok(totals) => {
                self.jobs
                    .mark_completed(record.id, totals.items_collected, totals.errors_count)
                    .await?;
                self.runs.complete(run_id, totals).await?;
                self.status.publish(
                    StatusEvent::new("completed", format!("Job {} completed", record.id))
                        .for_job(record.id)
                        .with_counts(totals.items_collected, totals.errors_count),
                );
                log_info!(
                    "Job {} completed: {} items, {} comments, {} errors",
                    record.id,
                    totals.items_collected,
                    totals.comments_collected,
                    totals.errors_count
                );
            }
            Err(e) => {
                let message = e.to_string();
                self.jobs.mark_failed(record.id, &message, 1).await?;
                self.runs.fail(run_id, &message, RunTotals::default()).await?;
                self.status.publish(
                    StatusEvent::new("failed", format!("Job {} failed: {}", record.id, message))
                        .for_job(record.id),
                );
                log_error!("Job {} failed: {}", record.id, message);
            }
        }

        Ok(())
    }

    /// Scrapes a list of feeds. A failing feed is counted and logged but
    /// never aborts the rest of the batch.
    async fn scrape_batch(&self, feed_names: &[String]) -> AppResult<RunTotals> {
        if feed_names.is_empty() {
            return Err(AppError::ConfigError(
                "Batch job has no feeds configured".to_string(),
            ));
        }

        let ticker_map = self.feeds.ticker_map().await?;
        let mut totals = RunTotals::default();

        for name in feed_names {
            let feed = match self.feeds.find_by_name(name).await? {
                Some(feed) => feed,
                None => {
                    log_warn!("Feed {} is not registered, skipping", name);
                    totals.errors_count += 1;
                    continue;
                }
            };

            match self.scrape_feed(&feed, &ticker_map).await {
                Ok((items, comments)) => {
                    totals.items_collected += items;
                    totals.comments_collected += comments;
                }
                Err(e) => {
                    log_error!("Failed to scrape feed {}: {}", name, e);
                    totals.errors_count += 1;
                }
            }

            // The attempt happened either way; last_scraped_at records it
            // so a failing feed does not look forgotten.
            self.feeds.touch_last_scraped(feed.id).await?;
        }

        Ok(totals)
    }

    /// Scrapes one feed: lists items with its configured sort and page size,
    /// drops anything older than the lookback window, and ingests the rest.
    async fn scrape_feed(
        &self,
        feed: &Feed,
        ticker_map: &HashMap<String, Vec<String>>,
    ) -> AppResult<(i32, i32)> {
        let items = self
            .platform
            .list_items(
                &feed.name,
                feed.scrape_sort,
                feed.scrape_time_filter.as_deref(),
                feed.scrape_limit,
            )
            .await?;

        let cutoff = Utc::now() - ChronoDuration::days(feed.lookback_days as i64);
        let mapped = ticker_map
            .get(&feed.name)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);

        let mut saved = 0;
        let mut comments_saved = 0;

        for item in items {
            if item.posted_at < cutoff {
                continue;
            }

            if let Some(new_comments) = self.ingest_item(item, &feed.name, mapped).await? {
                saved += 1;
                comments_saved += new_comments;
            }
        }

        log_debug!(
            "Feed {}: saved {} items, {} comments",
            feed.name,
            saved,
            comments_saved
        );
        Ok((saved, comments_saved))
    }

    /// Ingests one listed item. Returns None when the item was skipped
    /// (already stored, or not relevant to any tracked ticker), otherwise
    /// the number of comments stored with it.
    async fn ingest_item(
        &self,
        item: PlatformItem,
        feed_name: &str,
        mapped: &[String],
    ) -> AppResult<Option<i32>> {
        let full_text = format!("{} {}", item.title, item.content);
        let mentioned = extract_tickers(&full_text);

        if mentioned.is_empty() && !Feed::is_general_discussion(feed_name) && mapped.is_empty() {
            return Ok(None);
        }

        let (mentioned, primary) = resolve_primary_ticker(mentioned, mapped);
        let now = Utc::now();
        let tracking = decide_tracking(item.posted_at, item.reply_count, now);

        let post = Post {
            id: item.id.clone(),
            feed: feed_name.to_string(),
            title: truncated(&item.title, 500),
            author: none_if_empty(&item.author),
            content: none_if_empty(&item.content),
            url: none_if_empty(&item.url),
            score: item.score,
            upvote_ratio: Some(item.upvote_ratio),
            reply_count: item.reply_count,
            initial_reply_count: item.reply_count,
            is_relevant: !mentioned.is_empty(),
            mentioned_tickers: mentioned.clone(),
            primary_ticker: primary,
            track_enabled: tracking.is_some(),
            track_until: tracking.map(|t| t.track_until),
            last_rescrape_at: None,
            rescrape_count: 0,
            posted_at: item.posted_at,
            created_at: now,
        };

        if !self.posts.insert_post(&post).await? {
            return Ok(None); // already ingested on an earlier pass
        }

        if let Some(t) = &tracking {
            log_debug!(
                "Tracking {} until {} ({} replies at ingest)",
                post.id,
                t.track_until,
                item.reply_count
            );
        }

        self.item_pacer.wait().await?;
        let replies = self.platform.fetch_replies(feed_name, &item.id).await?;
        let comments: Vec<Comment> = replies
            .into_iter()
            .take(INGEST_COMMENT_LIMIT)
            .map(|reply| comment_from_reply(reply, &item.id, &mentioned))
            .collect();

        let stored = self.posts.insert_new_comments(&comments).await?;
        Ok(Some(stored as i32))
    }

    /// Follow-up pass over one tracked post: refresh its engagement
    /// snapshot, walk the full reply tree, and store whatever is new.
    async fn rescrape_comments(&self, post_id: &str, feed: &str) -> AppResult<RunTotals> {
        let post = self
            .posts
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} is not stored", post_id)))?;

        let fresh = self.platform.fetch_item(feed, post_id).await?;
        let replies = self.platform.fetch_replies(feed, post_id).await?;

        let comments: Vec<Comment> = replies
            .into_iter()
            .map(|reply| comment_from_reply(reply, post_id, &post.mentioned_tickers))
            .collect();
        let stored = self.posts.insert_new_comments(&comments).await?;

        let snapshot = EngagementSnapshot {
            score: fresh.score,
            upvote_ratio: Some(fresh.upvote_ratio),
            reply_count: fresh.reply_count,
        };
        self.posts
            .record_rescrape(post_id, snapshot, Utc::now())
            .await?;

        log_info!(
            "Rescraped {}: {} new comments, reply count {} -> {}",
            post_id,
            stored,
            post.reply_count,
            fresh.reply_count
        );

        Ok(RunTotals {
            items_collected: 0,
            comments_collected: stored as i32,
            errors_count: 0,
        })
    }
}

/// Chooses the post's primary ticker from its mentions and the feed's
/// mapped symbols.
///
/// A mention matching a mapped symbol wins; otherwise the first mention.
/// With no mentions at all, a mapped feed claims its first symbol and the
/// mention list inherits it, so posts in a dedicated feed still attach to
/// their ticker.
pub fn resolve_primary_ticker(
    mentioned: Vec<String>,
    mapped: &[String],
) -> (Vec<String>, Option<String>) {
    if !mentioned.is_empty() {
        let primary = mentioned
            .iter()
            .find(|t| mapped.contains(t))
            .or_else(|| mentioned.first())
            .cloned();
        return (mentioned, primary);
    }

    match mapped.first() {
        Some(symbol) => (vec![symbol.clone()], Some(symbol.clone())),
        None => (Vec::new(), None),
    }
}

fn comment_from_reply(reply: PlatformReply, post_id: &str, post_tickers: &[String]) -> Comment {
    let tickers = extract_tickers(&reply.content);
    let is_relevant = !tickers.is_empty() || !post_tickers.is_empty();

    Comment {
        id: reply.id,
        post_id: post_id.to_string(),
        author: none_if_empty(&reply.author),
        content: truncated(&reply.content, 5000),
        score: reply.score,
        mentioned_tickers: tickers,
        parent_id: reply.parent_id,
        depth: reply.depth,
        is_relevant,
        posted_at: reply.posted_at,
    }
}

fn none_if_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn truncated(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_matching_feed_mapping_wins_primary() {
        let (mentioned, primary) = resolve_primary_ticker(
            vec!["TSLA".to_string(), "AAPL".to_string()],
            &["AAPL".to_string()],
        );
        assert_eq!(primary.as_deref(), Some("AAPL"));
        assert_eq!(mentioned, vec!["TSLA", "AAPL"]);
    }

    #[test]
    fn first_mention_is_primary_without_a_mapping_match() {
        let (_, primary) = resolve_primary_ticker(
            vec!["TSLA".to_string(), "NVDA".to_string()],
            &["AAPL".to_string()],
        );
        assert_eq!(primary.as_deref(), Some("TSLA"));
    }

    #[test]
    fn mapped_feed_claims_posts_without_mentions() {
        let (mentioned, primary) =
            resolve_primary_ticker(Vec::new(), &["AAPL".to_string(), "GOOG".to_string()]);
        assert_eq!(primary.as_deref(), Some("AAPL"));
        assert_eq!(mentioned, vec!["AAPL"]);
    }

    #[test]
    fn no_mentions_and_no_mapping_means_no_primary() {
        let (mentioned, primary) = resolve_primary_ticker(Vec::new(), &[]);
        assert!(mentioned.is_empty());
        assert!(primary.is_none());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncated("héllo", 3), "hél");
        assert_eq!(truncated("ok", 10), "ok");
    }

    #[test]
    fn comment_relevance_inherits_from_post() {
        let reply = PlatformReply {
            id: "c1".to_string(),
            author: "u".to_string(),
            content: "no cashtags here".to_string(),
            score: 1,
            parent_id: None,
            depth: 0,
            posted_at: Utc::now(),
        };
        let comment = comment_from_reply(reply, "p1", &["AAPL".to_string()]);
        assert!(comment.is_relevant);
        assert!(comment.mentioned_tickers.is_empty());
    }
}
