pub mod domain;
pub mod infrastructure;

pub use domain::{Run, RunRepository, RunStatus, RunTotals, RunType};
pub use infrastructure::RunRepositoryImpl;
