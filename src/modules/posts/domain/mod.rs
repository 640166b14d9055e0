pub mod entities;
pub mod heat;
pub mod repository;
pub mod tickers;
pub mod tracking;

pub use entities::{Comment, EngagementSnapshot, Post};
pub use repository::PostRepository;
