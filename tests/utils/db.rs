/// Database test utilities with singleton pattern
///
/// Provides thread-safe access to the test database with proper isolation
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, Pool};
use diesel_migrations::MigrationHarness;
use std::sync::{Arc, Mutex, OnceLock};
use tickerwatch::shared::database::MIGRATIONS;

type PgPool = Pool<ConnectionManager<PgConnection>>;

static DB_POOL: OnceLock<Arc<PgPool>> = OnceLock::new();

/// Get or create singleton database pool for tests
pub fn get_test_db_pool() -> Arc<PgPool> {
    DB_POOL
        .get_or_init(|| {
            dotenvy::dotenv().ok();
            let test_db_url = std::env::var("TEST_DATABASE_URL")
                .expect("TEST_DATABASE_URL must be set in .env for tests");

            let manager = ConnectionManager::<PgConnection>::new(test_db_url);
            let pool = r2d2::Pool::builder()
                .max_size(10)
                .build(manager)
                .expect("Failed to create test database pool");

            let mut conn = pool.get().expect("Failed to get DB connection");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("Failed to run migrations on test database");
            drop(conn);

            Arc::new(pool)
        })
        .clone()
}

/// Clean all test tables - use at the start of each test
pub fn clean_test_db() {
    let pool = get_test_db_pool();
    let mut conn = pool.get().expect("Failed to get DB connection");

    diesel::sql_query("TRUNCATE TABLE scrape_jobs RESTART IDENTITY CASCADE")
        .execute(&mut conn)
        .expect("Failed to clean scrape_jobs");

    diesel::sql_query("TRUNCATE TABLE scraper_runs RESTART IDENTITY CASCADE")
        .execute(&mut conn)
        .expect("Failed to clean scraper_runs");

    diesel::sql_query("TRUNCATE TABLE comments RESTART IDENTITY CASCADE")
        .execute(&mut conn)
        .expect("Failed to clean comments");

    diesel::sql_query("TRUNCATE TABLE posts RESTART IDENTITY CASCADE")
        .execute(&mut conn)
        .expect("Failed to clean posts");

    diesel::sql_query("TRUNCATE TABLE feed_ticker_mappings RESTART IDENTITY CASCADE")
        .execute(&mut conn)
        .expect("Failed to clean feed_ticker_mappings");

    diesel::sql_query("TRUNCATE TABLE feeds RESTART IDENTITY CASCADE")
        .execute(&mut conn)
        .expect("Failed to clean feeds");
}

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Acquire test lock to ensure tests run serially
/// Returns a guard that releases the lock when dropped
pub fn acquire_test_lock() -> std::sync::MutexGuard<'static, ()> {
    // Handle poisoned mutex by recovering from panic
    match TEST_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
