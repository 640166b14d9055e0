pub mod broadcaster;

pub use broadcaster::{StatusBroadcaster, StatusEvent};
