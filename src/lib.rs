//! Forum engagement tracker: scrapes ticker discussion feeds on a schedule,
//! tracks fast-moving posts for comment follow-ups, and ranks stored posts
//! by a recency/engagement heat score.

pub mod modules;
pub mod schema;
pub mod shared;

pub use modules::feeds::{Feed, FeedRepository, FeedRepositoryImpl, ScrapeSort};
pub use modules::jobs::{
    Job, JobRecord, JobRepository, JobRepositoryImpl, JobService, JobSpec, JobStatus, ScrapeWorker,
    Scheduler,
};
pub use modules::platform::{PlatformClient, RedditClient};
pub use modules::posts::{Comment, Post, PostRepository, PostRepositoryImpl, PostService};
pub use modules::runs::{RunRepository, RunRepositoryImpl};
pub use modules::status::{StatusBroadcaster, StatusEvent};
pub use shared::errors::{AppError, AppResult};
