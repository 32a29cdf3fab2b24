use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::usage::global::get_last_seen_manager;

/// Overall shutdown deadline (seconds)
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Per-task deadline (seconds)
const TASK_TIMEOUT_SECS: u64 = 10;

/// Block until Ctrl+C, then flush buffered state before the process exits.
///
/// The whole sequence runs under an overall deadline; if it is exceeded the
/// process is terminated so a stuck database cannot hold shutdown hostage.
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, flushing data...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    let shutdown_result = timeout(
        Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
        perform_shutdown_tasks(),
    )
    .await;

    match shutdown_result {
        Ok(()) => {
            info!("All shutdown tasks completed successfully");
        }
        Err(_) => {
            error!(
                "Shutdown tasks timed out after {} seconds! Forcing exit.",
                SHUTDOWN_TIMEOUT_SECS
            );
            std::process::exit(1);
        }
    }
}

/// Run all shutdown tasks (called under the overall deadline).
async fn perform_shutdown_tasks() {
    if let Some(manager) = get_last_seen_manager() {
        match timeout(Duration::from_secs(TASK_TIMEOUT_SECS), manager.flush()).await {
            Ok(()) => {
                info!("Last-seen buffer flushed successfully");
            }
            Err(_) => {
                error!(
                    "Last-seen flush timed out after {} seconds",
                    TASK_TIMEOUT_SECS
                );
            }
        }
    } else {
        info!("Last-seen manager is not initialized, skipping flush");
    }
}
