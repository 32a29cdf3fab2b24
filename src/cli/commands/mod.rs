//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod cleanup;
mod create;
mod init_config;
mod list;
mod remove;
mod resolve;
mod stats;

pub use cleanup::cleanup_stale;
pub use create::create_short_url;
pub use init_config::init_config_file;
pub use list::list_short_urls;
pub use remove::remove_short_url;
pub use resolve::resolve_uid;
pub use stats::show_stats;
