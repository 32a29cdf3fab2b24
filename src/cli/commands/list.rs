//! List command

use colored::Colorize;
use std::sync::Arc;

use crate::cli::CliError;
use crate::services::ShortUrlService;
use crate::storage::UrlFilter;

pub async fn list_short_urls(
    service: Arc<ShortUrlService>,
    page: u64,
    page_size: u64,
    filter: Option<String>,
) -> Result<(), CliError> {
    let filter = UrlFilter {
        search: filter,
        ..Default::default()
    };

    let (records, total) = service
        .list_short_urls(filter, page, page_size)
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load short URLs: {}", e)))?;

    if records.is_empty() {
        println!("{} No short URLs found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Short URLs:".bold().green());
    println!();
    for record in &records {
        let mut info_parts = vec![format!(
            "{} -> {}",
            record.uid.cyan(),
            record.path.blue().underline()
        )];

        info_parts.push(
            format!(
                "(created: {})",
                record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            )
            .dimmed()
            .to_string(),
        );

        match record.last_seen_at {
            Some(seen) => info_parts.push(
                format!("(last seen: {})", seen.format("%Y-%m-%d %H:%M:%S UTC"))
                    .dimmed()
                    .cyan()
                    .to_string(),
            ),
            None => info_parts.push("(never resolved)".dimmed().yellow().to_string()),
        }

        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Page {}: showing {} of {} short URLs",
        "ℹ".bold().blue(),
        page,
        records.len(),
        total.to_string().green()
    );

    Ok(())
}
