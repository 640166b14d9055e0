/// Runtime configuration loaded from the environment.
///
/// Every knob has a default matching production behavior so the worker and
/// scheduler can start with nothing but DATABASE_URL set.
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Idle sleep between queue polls. Also bounds preemption latency for
    /// manually triggered priority-1 jobs.
    pub poll_interval: Duration,
    /// Delay between items when a job fetches comments item-by-item.
    pub item_delay: Duration,
    /// Runs stuck in `running` longer than this are failed at startup.
    pub stale_run_threshold: Duration,
    /// Cooldown after a storage-level error aborts an iteration.
    pub error_cooldown: Duration,
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(env_u64("POLL_INTERVAL_SECONDS", 5)),
            item_delay: Duration::from_secs(env_u64("ITEM_DELAY_SECONDS", 2)),
            stale_run_threshold: Duration::from_secs(env_u64("STALE_RUN_MINUTES", 30) * 60),
            error_cooldown: Duration::from_secs(env_u64("ERROR_COOLDOWN_SECONDS", 300)),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            item_delay: Duration::from_secs(2),
            stale_run_threshold: Duration::from_secs(30 * 60),
            error_cooldown: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Wall-clock interval between scheduled batch jobs.
    pub scrape_interval: Duration,
    /// Sleep before retrying after an unexpected error.
    pub error_retry: Duration,
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self {
            scrape_interval: Duration::from_secs(env_u64("SCRAPE_INTERVAL_MINUTES", 15) * 60),
            error_retry: Duration::from_secs(60),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scrape_interval: Duration::from_secs(15 * 60),
            error_retry: Duration::from_secs(60),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
