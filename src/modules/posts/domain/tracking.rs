/// Tracking decision engine
///
/// Decides, once at ingestion time, whether a post's comment section is
/// worth re-fetching and for how long. The decision is never re-evaluated
/// or extended afterwards; expiry is checked at query time against
/// `track_until`.
use crate::modules::jobs::domain::entities::priority;
use chrono::{DateTime, Duration, Utc};

/// Rule A: posts younger than this with any replies get a short window.
const FRESH_AGE_MINUTES: i64 = 60;
/// Rule B: posts younger than this with significant engagement get a week.
const RECENT_AGE_DAYS: i64 = 7;
/// Rule B reply threshold.
const ENGAGED_REPLY_COUNT: i32 = 10;

/// Minimum spacing between successive rescrapes of one post.
pub const RESCRAPE_INTERVAL_MINUTES: i64 = 15;
/// Per-scan cap on follow-up jobs, to bound queue growth.
pub const RESCRAPE_BATCH_LIMIT: i64 = 10;

/// Tracking window granted to a newly ingested post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingDecision {
    pub track_until: DateTime<Utc>,
}

/// Evaluate the tracking rules for a freshly ingested post.
///
/// Rules are ordered; the first match wins:
/// - Rule A: age < 60 minutes and at least one reply -> track for 1 day.
/// - Rule B: age < 7 days and 10+ replies -> track for 7 days.
/// - Otherwise tracking stays disabled.
pub fn decide_tracking(
    posted_at: DateTime<Utc>,
    reply_count: i32,
    now: DateTime<Utc>,
) -> Option<TrackingDecision> {
    let age = now - posted_at;

    if age < Duration::minutes(FRESH_AGE_MINUTES) && reply_count > 0 {
        return Some(TrackingDecision {
            track_until: now + Duration::days(1),
        });
    }

    if age < Duration::days(RECENT_AGE_DAYS) && reply_count >= ENGAGED_REPLY_COUNT {
        return Some(TrackingDecision {
            track_until: now + Duration::days(7),
        });
    }

    None
}

/// Queue priority for a follow-up job, tiered by post age.
pub fn rescrape_priority(posted_at: DateTime<Utc>, now: DateTime<Utc>) -> i32 {
    if now - posted_at < Duration::days(1) {
        priority::RESCRAPE_FRESH
    } else {
        priority::RESCRAPE_STALE
    }
}

/// True when a tracked post is due for another rescrape.
///
/// The repository applies the same condition in SQL when scanning; this
/// form exists for in-memory checks and tests.
pub fn rescrape_due(
    track_enabled: bool,
    track_until: Option<DateTime<Utc>>,
    last_rescrape_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    if !track_enabled {
        return false;
    }
    let Some(until) = track_until else {
        return false;
    };
    if now >= until {
        return false; // expired, even if track_enabled is still set in storage
    }
    match last_rescrape_at {
        None => true,
        Some(last) => now - last >= Duration::minutes(RESCRAPE_INTERVAL_MINUTES),
    }
}
