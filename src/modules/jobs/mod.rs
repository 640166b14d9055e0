/// Durable job queue module
///
/// Owns the queue table, the typed job payloads, the worker that drains the
/// queue and the scheduler that feeds it.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod scheduler;
pub mod worker;

pub use application::JobService;
pub use domain::{
    entities::{priority, Job, JobRecord, JobSpec, JobStatus},
    repository::{JobRepository, JobStatistics},
};
pub use infrastructure::JobRepositoryImpl;
pub use scheduler::Scheduler;
pub use worker::ScrapeWorker;
