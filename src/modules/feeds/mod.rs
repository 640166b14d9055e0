pub mod domain;
pub mod infrastructure;

pub use domain::{Feed, FeedRepository, ScrapeSort};
pub use infrastructure::FeedRepositoryImpl;
