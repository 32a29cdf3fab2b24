//! System-level utilities
//!
//! Process-wide concerns that sit below the application logic,
//! currently the tracing/logging setup.

pub mod logging;

pub use logging::{init_cli_logging, init_logging};
