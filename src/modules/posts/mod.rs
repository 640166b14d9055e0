/// Ingested content module
///
/// Owns posts and their threaded comments, plus the pure logic that runs
/// over them at ingestion and read time:
/// - Ticker extraction (cashtag pattern matching)
/// - Tracking decision engine (which posts keep getting re-fetched)
/// - Heat scoring (recency + engagement ranking)
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{PostService, RankedPost};
pub use domain::{
    entities::{Comment, EngagementSnapshot, Post},
    repository::PostRepository,
};
pub use infrastructure::PostRepositoryImpl;
