//! Queue worker process: claims scrape jobs and executes them.

use anyhow::Context;
use std::sync::Arc;
use tickerwatch::modules::feeds::FeedRepositoryImpl;
use tickerwatch::modules::jobs::{JobRepositoryImpl, ScrapeWorker};
use tickerwatch::modules::platform::RedditClient;
use tickerwatch::modules::posts::PostRepositoryImpl;
use tickerwatch::modules::runs::RunRepositoryImpl;
use tickerwatch::modules::status::StatusBroadcaster;
use tickerwatch::shared::config::WorkerConfig;
use tickerwatch::shared::database::Database;
use tickerwatch::shared::utils::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let config = WorkerConfig::from_env();
    let database = Database::new().context("database initialization failed")?;
    database
        .run_migrations()
        .context("database migration failed")?;
    let pool = database.pool().clone();

    let worker = ScrapeWorker::new(
        config,
        Arc::new(JobRepositoryImpl::new(pool.clone())),
        Arc::new(PostRepositoryImpl::new(pool.clone())),
        Arc::new(FeedRepositoryImpl::new(pool.clone())),
        Arc::new(RunRepositoryImpl::new(pool)),
        Arc::new(RedditClient::new()),
        Arc::new(StatusBroadcaster::new()),
    );

    worker.run().await.context("worker loop exited")?;
    Ok(())
}
