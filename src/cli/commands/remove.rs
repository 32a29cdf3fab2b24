//! Remove command

use colored::Colorize;
use std::sync::Arc;

use crate::cli::CliError;
use crate::errors::GotolinkError;
use crate::services::ShortUrlService;

pub async fn remove_short_url(service: Arc<ShortUrlService>, uid: String) -> Result<(), CliError> {
    match service.delete_short_url(&uid).await {
        Ok(()) => {
            println!("{} Deleted short URL: {}", "✓".bold().green(), uid.cyan());
            Ok(())
        }
        Err(GotolinkError::NotFound(_)) => Err(CliError::CommandError(format!(
            "Short URL does not exist: {}",
            uid
        ))),
        Err(e) => Err(CliError::CommandError(format!("Failed to delete: {}", e))),
    }
}
