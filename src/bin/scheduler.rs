//! Scheduler process: queues a batch scrape every interval.

use anyhow::Context;
use std::sync::Arc;
use tickerwatch::modules::feeds::FeedRepositoryImpl;
use tickerwatch::modules::jobs::{JobRepositoryImpl, Scheduler};
use tickerwatch::shared::config::SchedulerConfig;
use tickerwatch::shared::database::Database;
use tickerwatch::shared::utils::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let config = SchedulerConfig::from_env();
    let database = Database::new().context("database initialization failed")?;
    database
        .run_migrations()
        .context("database migration failed")?;
    let pool = database.pool().clone();

    let scheduler = Scheduler::new(
        config,
        Arc::new(JobRepositoryImpl::new(pool.clone())),
        Arc::new(FeedRepositoryImpl::new(pool)),
    );

    scheduler.run().await.context("scheduler loop exited")?;
    Ok(())
}
