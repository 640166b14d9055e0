/// Cashtag extraction from post and comment text
use regex::Regex;
use std::sync::OnceLock;

/// Ticker pattern (e.g., $AAPL, $TSLA): sigil + 1-5 uppercase letters, word-bounded
fn ticker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$([A-Z]{1,5})\b").expect("invalid ticker pattern"))
}

/// Extract ticker symbols mentioned in text.
///
/// Deterministic and free of I/O. Duplicates are removed while preserving
/// first-mention order; empty input yields an empty set.
pub fn extract_tickers(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut tickers = Vec::new();

    for capture in ticker_pattern().captures_iter(text) {
        let symbol = capture[1].to_string();
        if seen.insert(symbol.clone()) {
            tickers.push(symbol);
        }
    }

    tickers
}
