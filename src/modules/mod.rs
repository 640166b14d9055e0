pub mod feeds;
pub mod jobs;
pub mod platform;
pub mod posts;
pub mod runs;
pub mod status;
