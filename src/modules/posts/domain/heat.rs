/// Heat scoring for ranking recently ingested posts
///
/// Heat blends a recency decay with capped engagement terms and a small
/// bonus for ticker signal. It is computed at read time for ranking only
/// and never persisted.
use chrono::{DateTime, Utc};

/// Recency holds at 100 for this many hours before decay begins.
const GRACE_WINDOW_HOURS: f64 = 4.0;
/// Decay time constant, in hours.
const DECAY_HOURS: f64 = 6.0;
/// Upvotes at which the score term saturates (score / 20 capped at 10).
const SCORE_CAP_DIVISOR: f64 = 20.0;
/// Replies at which the reply term saturates (replies / 10 capped at 10).
const REPLY_CAP_DIVISOR: f64 = 10.0;

/// Minimum-engagement floor: posts below BOTH thresholds are not ranked.
const MIN_SCORE: i32 = 2;
const MIN_REPLIES: i32 = 2;

/// Component breakdown of a post's heat score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatScore {
    pub heat: f64,
    pub recency_score: f64,
    pub engagement_score: f64,
    pub ticker_bonus: f64,
}

/// Inputs for heat scoring, decoupled from the storage model
#[derive(Debug, Clone)]
pub struct HeatInput {
    pub posted_at: DateTime<Utc>,
    pub score: i32,
    pub reply_count: i32,
    pub has_mentions: bool,
    pub has_primary_ticker: bool,
}

/// Compute the heat score for one post at time `now`.
pub fn heat_score(input: &HeatInput, now: DateTime<Utc>) -> HeatScore {
    let hours_since_posted =
        (now - input.posted_at).num_milliseconds() as f64 / (1000.0 * 3600.0);

    let recency_score = if hours_since_posted < GRACE_WINDOW_HOURS {
        100.0
    } else {
        100.0 * (-(hours_since_posted - GRACE_WINDOW_HOURS) / DECAY_HOURS).exp()
    };

    let score_term = (input.score as f64 / SCORE_CAP_DIVISOR).min(10.0) * 6.0;
    let reply_term = (input.reply_count as f64 / REPLY_CAP_DIVISOR).min(10.0) * 4.0;
    let engagement_score = score_term + reply_term;

    let ticker_bonus = match (input.has_mentions, input.has_primary_ticker) {
        (true, true) => 10.0,
        (true, false) => 5.0,
        // A resolved primary ticker implies a mention
        (false, true) => 10.0,
        (false, false) => 0.0,
    };

    HeatScore {
        heat: recency_score * 0.60 + engagement_score * 0.40 + ticker_bonus,
        recency_score,
        engagement_score,
        ticker_bonus,
    }
}

/// True when a post clears the minimum-engagement floor for ranking.
pub fn meets_ranking_floor(score: i32, reply_count: i32) -> bool {
    score >= MIN_SCORE || reply_count >= MIN_REPLIES
}

/// Rank a candidate set by heat, hottest first.
///
/// Posts below the engagement floor are dropped before scoring. The caller
/// is expected to have restricted candidates to a recency window (e.g. the
/// last 24 hours) at query time.
pub fn rank_posts<T, F>(candidates: Vec<T>, now: DateTime<Utc>, to_input: F) -> Vec<(T, HeatScore)>
where
    F: Fn(&T) -> HeatInput,
{
    let mut scored: Vec<(T, HeatScore)> = candidates
        .into_iter()
        .filter_map(|post| {
            let input = to_input(&post);
            if !meets_ranking_floor(input.score, input.reply_count) {
                return None;
            }
            let score = heat_score(&input, now);
            Some((post, score))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.heat
            .partial_cmp(&a.1.heat)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn input(hours_old: i64, score: i32, replies: i32) -> (HeatInput, DateTime<Utc>) {
        let now = Utc::now();
        (
            HeatInput {
                posted_at: now - Duration::hours(hours_old),
                score,
                reply_count: replies,
                has_mentions: false,
                has_primary_ticker: false,
            },
            now,
        )
    }

    #[test]
    fn recency_is_constant_inside_grace_window() {
        for hours in [0, 1, 2, 3] {
            let (input, now) = input(hours, 0, 0);
            assert_eq!(heat_score(&input, now).recency_score, 100.0);
        }
    }

    #[test]
    fn heat_decays_monotonically_after_grace_window() {
        let mut previous = f64::MAX;
        for hours in [4, 5, 8, 12, 24, 48] {
            let (input, now) = input(hours, 50, 20);
            let score = heat_score(&input, now);
            assert!(
                score.heat < previous,
                "heat at {}h should be below heat at the prior step",
                hours
            );
            previous = score.heat;
        }
    }

    #[test]
    fn engagement_saturates_exactly_at_caps() {
        // score=20 -> min(1, 10) * 6 = 6; replies=10 -> min(1, 10) * 4 = 4
        let (below_cap, now) = input(1, 20, 10);
        assert_eq!(heat_score(&below_cap, now).engagement_score, 10.0);

        // Saturation ceilings: score=200 and replies=100 give the max 100
        let (at_cap, now) = input(1, 200, 100);
        assert_eq!(heat_score(&at_cap, now).engagement_score, 100.0);

        // Beyond the caps nothing more accrues
        let (beyond_cap, now) = input(1, 100_000, 50_000);
        assert_eq!(heat_score(&beyond_cap, now).engagement_score, 100.0);
    }

    #[test]
    fn ticker_bonus_tiers() {
        let now = Utc::now();
        let base = HeatInput {
            posted_at: now,
            score: 0,
            reply_count: 0,
            has_mentions: false,
            has_primary_ticker: false,
        };

        assert_eq!(heat_score(&base, now).ticker_bonus, 0.0);

        let mentioned = HeatInput {
            has_mentions: true,
            ..base.clone()
        };
        assert_eq!(heat_score(&mentioned, now).ticker_bonus, 5.0);

        let primary = HeatInput {
            has_mentions: true,
            has_primary_ticker: true,
            ..base
        };
        assert_eq!(heat_score(&primary, now).ticker_bonus, 10.0);
    }

    #[test]
    fn ranking_floor_excludes_dead_posts() {
        assert!(!meets_ranking_floor(1, 1));
        assert!(meets_ranking_floor(2, 0));
        assert!(meets_ranking_floor(0, 2));
    }

    #[test]
    fn rank_orders_hottest_first_and_drops_floor_misses() {
        let now = Utc::now();
        let posts = vec![
            ("cold", 30, 1, 1),   // below floor, dropped
            ("old", 30, 80, 40),  // heavy engagement, stale
            ("fresh", 1, 80, 40), // same engagement, fresh
        ];

        let ranked = rank_posts(posts, now, |&(_, hours, score, replies)| HeatInput {
            posted_at: now - Duration::hours(hours),
            score,
            reply_count: replies,
            has_mentions: false,
            has_primary_ticker: false,
        });

        let names: Vec<&str> = ranked.iter().map(|(p, _)| p.0).collect();
        assert_eq!(names, vec!["fresh", "old"]);
    }
}
