pub mod entities;
pub mod repository;

pub use entities::{Run, RunStatus, RunTotals, RunType};
pub use repository::RunRepository;
