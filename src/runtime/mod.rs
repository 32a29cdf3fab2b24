//! Application lifecycle and execution modes
//!
//! `modes` routes a process invocation to server or CLI execution,
//! `lifetime` owns startup wiring and graceful shutdown.

pub mod lifetime;
pub mod modes;

pub use modes::{Mode, detect_mode};
