//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for gotolink using clap's derive macros.

use clap::{Parser, Subcommand};

/// Gotolink - a short URL service for in-app paths
#[derive(Parser)]
#[command(name = "gotolink")]
#[command(version)]
#[command(about = "Create and resolve short URLs for in-app paths", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create a short URL for a relative path
    Create {
        /// In-app path to shorten (relative, e.g. "d/abc/dashboard?x=1")
        path: String,

        /// User id recorded as the creator
        #[arg(long, default_value_t = 0)]
        user: i64,
    },

    /// Resolve a UID to its stored path
    Resolve {
        /// UID to resolve
        uid: String,
    },

    /// List short URLs
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u64,

        /// Records per page
        #[arg(long, default_value_t = 20)]
        page_size: u64,

        /// Substring filter on UID or path
        #[arg(long)]
        filter: Option<String>,
    },

    /// Remove a short URL
    Remove {
        /// UID to remove
        uid: String,
    },

    /// Delete never-resolved short URLs older than the retention window
    Cleanup {
        /// Retention window in days (default: cleanup.retention_days)
        #[arg(long)]
        retention_days: Option<u64>,

        /// Count matching records without deleting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show aggregate usage counts
    Stats,

    /// Generate an example configuration file
    InitConfig {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
