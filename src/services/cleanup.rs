//! Stale short URL cleanup
//!
//! Deletes short URLs that were never resolved and have outlived the
//! retention window, keeping the table from growing without bound.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::{error, info};

use crate::cache::CompositeCacheTrait;
use crate::config::get_config;
use crate::storage::SeaOrmStorage;

/// Cleanup report
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Number of stale short URLs deleted
    pub urls_deleted: u64,
    /// Whether the existence filter was rebuilt afterwards
    pub filter_rebuilt: bool,
}

/// Periodic deletion of never-resolved short URLs.
pub struct StaleUrlCleaner {
    storage: Arc<SeaOrmStorage>,
    cache: Arc<dyn CompositeCacheTrait>,
    /// Days a never-resolved short URL is kept
    retention_days: u64,
    /// False positive rate used when rebuilding the existence filter
    bloom_fp_rate: f64,
}

impl StaleUrlCleaner {
    pub fn new(storage: Arc<SeaOrmStorage>, cache: Arc<dyn CompositeCacheTrait>) -> Self {
        let config = get_config();

        Self {
            storage,
            cache,
            retention_days: config.cleanup.retention_days,
            bloom_fp_rate: config.cache.bloom.fp_rate,
        }
    }

    /// Run one cleanup pass with the configured retention window.
    pub async fn run_cleanup(&self) -> anyhow::Result<CleanupReport> {
        self.run_with_retention(self.retention_days).await
    }

    /// Run one cleanup pass with an explicit retention window.
    pub async fn run_with_retention(&self, retention_days: u64) -> anyhow::Result<CleanupReport> {
        let mut report = CleanupReport::default();
        let cutoff = Utc::now() - Duration::days(retention_days as i64);

        report.urls_deleted = self.storage.delete_stale(cutoff).await?;

        // Deleted UIDs linger in the bloom filter; rebuild it from the
        // survivors so lookups stop matching them
        if report.urls_deleted > 0 {
            let uids = self.storage.load_all_uids().await?;
            self.cache.rebuild_filter(&uids, self.bloom_fp_rate).await?;
            report.filter_rebuilt = true;
        }

        info!(
            "Stale URL cleanup completed: {} deleted, filter rebuilt: {}",
            report.urls_deleted, report.filter_rebuilt
        );

        Ok(report)
    }

    /// Count what a cleanup pass would delete, without deleting.
    pub async fn preview(&self, retention_days: u64) -> anyhow::Result<u64> {
        let cutoff = Utc::now() - Duration::days(retention_days as i64);
        Ok(self.storage.count_stale(cutoff).await?)
    }

    /// Start the periodic cleanup task.
    pub fn spawn_background_task(self: Arc<Self>, interval_hours: u64) {
        tokio::spawn(async move {
            let interval = StdDuration::from_secs(interval_hours * 60 * 60);

            // First run is delayed by 5 minutes
            tokio::time::sleep(StdDuration::from_secs(300)).await;

            loop {
                if let Err(e) = self.run_cleanup().await {
                    error!("Stale URL cleanup task failed: {}", e);
                }

                tokio::time::sleep(interval).await;
            }
        });

        info!(
            "Stale URL cleanup background task started (interval: {} hours)",
            interval_hours
        );
    }
}
