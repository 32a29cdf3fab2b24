//! Resolve command

use colored::Colorize;
use std::sync::Arc;

use crate::cli::CliError;
use crate::errors::GotolinkError;
use crate::services::ShortUrlService;

pub async fn resolve_uid(service: Arc<ShortUrlService>, uid: String) -> Result<(), CliError> {
    // Plain fetch, so an admin peeking at a mapping does not count as usage
    let record = match service.get_short_url(&uid).await {
        Ok(record) => record,
        Err(GotolinkError::NotFound(_)) => {
            return Err(CliError::CommandError(format!(
                "Short URL does not exist: {}",
                uid
            )));
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "{} {} -> {}",
        "✓".bold().green(),
        record.uid.cyan(),
        record.path.blue().underline()
    );
    println!(
        "  created by user {} at {}",
        record.created_by.to_string().cyan(),
        record
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .yellow()
    );
    match record.last_seen_at {
        Some(seen) => println!(
            "  last seen {}",
            seen.format("%Y-%m-%d %H:%M:%S UTC").to_string().yellow()
        ),
        None => println!("  {}", "never resolved".dimmed()),
    }

    Ok(())
}
