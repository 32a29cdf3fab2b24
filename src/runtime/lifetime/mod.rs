//! Startup and shutdown lifecycle

pub mod shutdown;
pub mod startup;
