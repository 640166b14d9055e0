pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{Job, JobRecord, JobSpec, JobStatus};
pub use repository::{JobRepository, JobStatistics};
