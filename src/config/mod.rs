pub mod args;
mod r#impl;
mod structs;

pub use r#impl::{get_config, init_config, init_config_from, set_config};
pub use structs::*;
