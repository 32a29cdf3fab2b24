//! Stats command

use colored::Colorize;
use std::sync::Arc;

use crate::cli::CliError;
use crate::services::ShortUrlService;

pub async fn show_stats(service: Arc<ShortUrlService>) -> Result<(), CliError> {
    let stats = service
        .get_stats()
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load statistics: {}", e)))?;

    println!("{}", "Short URL statistics:".bold().green());
    println!();
    println!("  Total:          {}", stats.total_urls.to_string().green());
    println!("  Resolved:       {}", stats.resolved_urls.to_string().cyan());
    println!(
        "  Never resolved: {}",
        stats.never_resolved.to_string().yellow()
    );

    Ok(())
}
