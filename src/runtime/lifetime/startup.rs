use crate::cache;
use crate::services::{ShortUrlService, StaleUrlCleaner};
use crate::storage::{SeaOrmStorage, StorageFactory};
use crate::usage::global::set_global_last_seen_manager;
use crate::usage::manager::LastSeenManager;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Everything the HTTP server needs, assembled once before binding.
///
/// The cache is owned by the service; handlers never touch it directly.
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub service: Arc<ShortUrlService>,
}

/// Prepare the server startup context: storage, cache, services and
/// background tasks.
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = crate::config::get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let cache = cache::build_cache().context("Failed to build cache")?;

    // Warm the existence filter from the authoritative UID list. A partial
    // filter would misreport half the dataset as missing, so this is fatal.
    let uids = storage
        .load_all_uids()
        .await
        .context("Failed to load UIDs for the existence filter")?;
    let uid_count = uids.len();
    cache
        .rebuild_filter(&uids, config.cache.bloom.fp_rate)
        .await
        .context("Failed to build the existence filter")?;
    debug!("Existence filter initialized with {} UIDs", uid_count);

    let service = Arc::new(ShortUrlService::new(storage.clone(), cache.clone()));

    // Last-seen updates are buffered in memory and written behind; keep a
    // strong reference in the spawned task so it outlives this scope.
    let last_seen_manager = Arc::new(LastSeenManager::new(
        storage.as_last_seen_sink(),
        Duration::from_secs(config.short_urls.flush_interval_secs),
        config.short_urls.flush_threshold,
    ));
    set_global_last_seen_manager(last_seen_manager.clone());
    let manager_for_task = last_seen_manager.clone();
    tokio::spawn(async move {
        manager_for_task.start_background_task().await;
    });
    debug!(
        "LastSeenManager initialized with {} second interval and {} pending threshold",
        config.short_urls.flush_interval_secs, config.short_urls.flush_threshold
    );

    if config.cleanup.enabled {
        let cleaner = Arc::new(StaleUrlCleaner::new(storage.clone(), cache.clone()));
        cleaner.spawn_background_task(config.cleanup.interval_hours);
        debug!(
            "Stale URL cleanup initialized ({} hour interval, {} day retention)",
            config.cleanup.interval_hours, config.cleanup.retention_days
        );
    } else {
        debug!("Stale URL cleanup is disabled");
    }

    if config.api.admin_token.is_empty() {
        info!("Admin API is disabled (api.admin_token not set)");
    } else {
        info!("Admin API available at: {}", config.api.route_prefix);
    }

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage, service })
}
