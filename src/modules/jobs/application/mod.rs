pub mod service;

pub use service::JobService;
