pub mod global;
pub mod manager;
pub mod sink;

pub use manager::LastSeenManager;
pub use sink::LastSeenSink;
