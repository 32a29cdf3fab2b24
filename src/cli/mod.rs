//! CLI interface module
//!
//! Admin commands operating directly on the configured storage, without a
//! running server. Output goes to stdout; warnings and errors log to stderr.

pub mod args;
pub mod commands;

use std::fmt;
use std::sync::Arc;

use clap::Parser;

use crate::cache::NullCompositeCache;
use crate::services::{ShortUrlService, StaleUrlCleaner};
use crate::storage::StorageFactory;
use args::{Cli, Commands};
use commands::{
    cleanup_stale, create_short_url, init_config_file, list_short_urls, remove_short_url,
    resolve_uid, show_stats,
};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
}

impl CliError {
    /// Format as plain output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::GotolinkError> for CliError {
    fn from(err: crate::errors::GotolinkError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

/// Parse argv and execute the selected command.
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    run_cli_command(cli.command).await
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // init-config only touches the filesystem, no storage needed
    if let Commands::InitConfig { output_path, force } = cmd {
        return init_config_file(output_path, force);
    }

    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    // One-shot commands skip the cache warmup; every lookup goes to storage
    let cache = NullCompositeCache::arc();
    let service = Arc::new(ShortUrlService::new(storage.clone(), cache.clone()));

    match cmd {
        Commands::Create { path, user } => create_short_url(service, path, user).await,

        Commands::Resolve { uid } => resolve_uid(service, uid).await,

        Commands::List {
            page,
            page_size,
            filter,
        } => list_short_urls(service, page, page_size, filter).await,

        Commands::Remove { uid } => remove_short_url(service, uid).await,

        Commands::Cleanup {
            retention_days,
            dry_run,
        } => {
            let cleaner = Arc::new(StaleUrlCleaner::new(storage, cache));
            cleanup_stale(cleaner, retention_days, dry_run).await
        }

        Commands::Stats => show_stats(service).await,

        Commands::InitConfig { .. } => unreachable!("handled above"),
    }
}
