pub mod entities;
pub mod repository;

pub use entities::{Feed, ScrapeSort};
pub use repository::FeedRepository;
