pub mod client;
pub mod dto;
pub mod reddit;

pub use client::{PlatformClient, PlatformItem, PlatformReply};
pub use reddit::RedditClient;
