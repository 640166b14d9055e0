/// Domain entities for source feeds
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sort order used when listing a feed on the external platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeSort {
    Hot,
    New,
    Top,
    Rising,
}

impl Default for ScrapeSort {
    fn default() -> Self {
        ScrapeSort::Hot
    }
}

impl std::fmt::Display for ScrapeSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeSort::Hot => write!(f, "hot"),
            ScrapeSort::New => write!(f, "new"),
            ScrapeSort::Top => write!(f, "top"),
            ScrapeSort::Rising => write!(f, "rising"),
        }
    }
}

impl std::str::FromStr for ScrapeSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hot" => Ok(ScrapeSort::Hot),
            "new" => Ok(ScrapeSort::New),
            "top" => Ok(ScrapeSort::Top),
            "rising" => Ok(ScrapeSort::Rising),
            _ => Err(format!("Invalid scrape sort: {}", s)),
        }
    }
}

/// A source feed (forum sub-community) with its fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub scrape_sort: ScrapeSort,
    pub scrape_time_filter: Option<String>,
    pub scrape_limit: i32,
    pub lookback_days: i32,
    pub created_at: DateTime<Utc>,
}

/// Feeds whose discussion is assumed on-topic even without explicit
/// ticker mentions.
pub const GENERAL_DISCUSSION_FEEDS: [&str; 2] = ["investing", "stocks"];

impl Feed {
    pub fn is_general_discussion(name: &str) -> bool {
        GENERAL_DISCUSSION_FEEDS.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_sort_round_trip() {
        for sort in [
            ScrapeSort::Hot,
            ScrapeSort::New,
            ScrapeSort::Top,
            ScrapeSort::Rising,
        ] {
            assert_eq!(sort.to_string().parse::<ScrapeSort>().unwrap(), sort);
        }
        assert!("upside_down".parse::<ScrapeSort>().is_err());
    }

    #[test]
    fn general_discussion_feeds() {
        assert!(Feed::is_general_discussion("stocks"));
        assert!(!Feed::is_general_discussion("AAPL"));
    }
}
