//! Create command

use colored::Colorize;
use std::sync::Arc;

use crate::cli::CliError;
use crate::errors::GotolinkError;
use crate::services::{CreateShortUrlRequest, ShortUrlService};

pub async fn create_short_url(
    service: Arc<ShortUrlService>,
    path: String,
    user: i64,
) -> Result<(), CliError> {
    let record = match service
        .create_short_url(CreateShortUrlRequest {
            path,
            created_by: user,
        })
        .await
    {
        Ok(record) => record,
        Err(e @ (GotolinkError::InvalidPath(_) | GotolinkError::AbsolutePath(_))) => {
            return Err(CliError::CommandError(e.message().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let config = crate::config::get_config();
    let url = format!(
        "{}/goto/{}",
        config.server.public_url.trim_end_matches('/'),
        record.uid
    );

    println!(
        "{} Created short URL: {} -> {}",
        "✓".bold().green(),
        record.uid.cyan(),
        record.path.blue().underline()
    );
    println!("{} {}", "ℹ".bold().blue(), url.blue().underline());

    Ok(())
}
