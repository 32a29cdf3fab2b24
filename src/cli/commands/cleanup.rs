//! Stale cleanup command

use colored::Colorize;
use std::sync::Arc;

use crate::cli::CliError;
use crate::services::StaleUrlCleaner;

pub async fn cleanup_stale(
    cleaner: Arc<StaleUrlCleaner>,
    retention_days: Option<u64>,
    dry_run: bool,
) -> Result<(), CliError> {
    let config = crate::config::get_config();
    let retention = retention_days.unwrap_or(config.cleanup.retention_days);

    if dry_run {
        let count = cleaner.preview(retention).await.map_err(|e| {
            CliError::CommandError(format!("Failed to count stale short URLs: {}", e))
        })?;
        println!(
            "{} {} never-resolved short URLs older than {} days would be deleted",
            "ℹ".bold().blue(),
            count.to_string().yellow(),
            retention
        );
        return Ok(());
    }

    let report = cleaner
        .run_with_retention(retention)
        .await
        .map_err(|e| CliError::CommandError(format!("Cleanup failed: {}", e)))?;

    println!(
        "{} Deleted {} stale short URLs (retention: {} days)",
        "✓".bold().green(),
        report.urls_deleted.to_string().green(),
        retention
    );

    Ok(())
}
