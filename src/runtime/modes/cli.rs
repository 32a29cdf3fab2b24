//! CLI mode
//!
//! This module contains the CLI mode startup logic.
//! It delegates to the actual CLI implementation.

use crate::cli::CliError;

/// Run CLI mode
pub async fn run_cli() -> Result<(), CliError> {
    crate::cli::run_cli().await
}
