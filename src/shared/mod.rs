pub mod config;
pub mod database;
pub mod errors;
pub mod utils;

pub use config::{SchedulerConfig, WorkerConfig};
pub use database::{Database, DbConnection, DbPool};
