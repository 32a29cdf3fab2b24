//! Short URL management service
//!
//! Provides unified business logic for short URL operations, shared
//! between the HTTP handlers and the CLI.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::cache::traits::{CacheResult, CompositeCacheTrait};
use crate::config::get_config;
use crate::errors::{GotolinkError, Result};
use crate::storage::{SeaOrmStorage, ShortUrl, UrlFilter, UrlStats};
use crate::usage::global::get_last_seen_manager;
use crate::utils::generate_uid;
use crate::utils::is_valid_uid;
use crate::utils::path_validator::{PathValidationError, validate_relative_path};

/// Fresh UIDs rolled before giving up on a create
const MAX_UID_ATTEMPTS: usize = 3;

/// Request to create a new short URL
#[derive(Debug, Clone)]
pub struct CreateShortUrlRequest {
    /// Relative path the short URL resolves to
    pub path: String,
    /// User id of the creator (0 = anonymous)
    pub created_by: i64,
}

/// Service for short URL operations
///
/// Encapsulates validation, UID allocation and cache maintenance so the
/// HTTP and CLI front ends behave identically.
pub struct ShortUrlService {
    storage: Arc<SeaOrmStorage>,
    cache: Arc<dyn CompositeCacheTrait>,
}

impl ShortUrlService {
    pub fn new(storage: Arc<SeaOrmStorage>, cache: Arc<dyn CompositeCacheTrait>) -> Self {
        Self { storage, cache }
    }

    /// Configured UID length
    fn uid_length(&self) -> usize {
        get_config().short_urls.uid_length
    }

    // ============ CRUD Operations ============

    /// Create a new short URL for a relative path.
    ///
    /// Identical paths are not deduplicated: every call allocates a new
    /// UID. On a UID collision a fresh UID is rolled, up to
    /// `MAX_UID_ATTEMPTS` times.
    pub async fn create_short_url(&self, req: CreateShortUrlRequest) -> Result<ShortUrl> {
        let path = validate_relative_path(&req.path)
            .map_err(|e| match e {
                PathValidationError::AbsolutePath(_) => GotolinkError::absolute_path(e.to_string()),
                _ => GotolinkError::invalid_path(e.to_string()),
            })?
            .to_string();

        let uid_length = self.uid_length();

        for attempt in 1..=MAX_UID_ATTEMPTS {
            let uid = generate_uid(uid_length);

            // Cheap probe first; the unique constraint still backstops
            // concurrent creates
            if self.storage.exists(&uid).await {
                debug!(
                    "UID '{}' already taken (attempt {}/{})",
                    uid, attempt, MAX_UID_ATTEMPTS
                );
                continue;
            }

            let record = ShortUrl {
                uid: uid.clone(),
                path: path.clone(),
                created_by: req.created_by,
                created_at: Utc::now(),
                last_seen_at: None,
            };

            match self.storage.insert(&record).await {
                Ok(()) => {
                    self.cache.insert(uid, record.clone()).await;
                    info!(
                        "ShortUrlService: created '{}' -> '{}'",
                        record.uid, record.path
                    );
                    return Ok(record);
                }
                Err(GotolinkError::Conflict(msg)) => {
                    // Lost the race on the unique constraint, roll again
                    debug!(
                        "Insert conflict (attempt {}/{}): {}",
                        attempt, MAX_UID_ATTEMPTS, msg
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(GotolinkError::conflict(format!(
            "could not allocate a free UID after {} attempts",
            MAX_UID_ATTEMPTS
        )))
    }

    /// Resolve a UID to its record, marking it as seen.
    ///
    /// Malformed UIDs resolve to `NotFound` without touching storage.
    pub async fn resolve(&self, uid: &str) -> Result<ShortUrl> {
        if !is_valid_uid(uid) {
            return Err(GotolinkError::not_found(format!(
                "short URL not found: {uid}"
            )));
        }

        let record = match self.cache.get(uid).await {
            CacheResult::Found(record) => record,
            CacheResult::ExistsButNoValue => {
                debug!("Object cache miss for uid: {}", uid);
                match self.storage.get(uid).await {
                    Some(record) => {
                        self.cache.insert(uid.to_string(), record.clone()).await;
                        record
                    }
                    None => {
                        return Err(GotolinkError::not_found(format!(
                            "short URL not found: {uid}"
                        )));
                    }
                }
            }
            CacheResult::NotFound => {
                debug!("Existence filter ruled out uid: {}", uid);
                return Err(GotolinkError::not_found(format!(
                    "short URL not found: {uid}"
                )));
            }
        };

        Self::record_last_seen(uid);
        Ok(record)
    }

    /// Fetch a record without marking it as seen.
    pub async fn get_short_url(&self, uid: &str) -> Result<ShortUrl> {
        if !is_valid_uid(uid) {
            return Err(GotolinkError::not_found(format!(
                "short URL not found: {uid}"
            )));
        }

        self.storage
            .get(uid)
            .await
            .ok_or_else(|| GotolinkError::not_found(format!("short URL not found: {uid}")))
    }

    /// Delete a short URL and evict it from the cache.
    pub async fn delete_short_url(&self, uid: &str) -> Result<()> {
        self.storage.remove(uid).await?;
        self.cache.remove(uid).await;

        info!("ShortUrlService: deleted '{}'", uid);
        Ok(())
    }

    /// List short URLs with pagination and filtering.
    pub async fn list_short_urls(
        &self,
        filter: UrlFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<ShortUrl>, u64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        self.storage.list_paginated(page, page_size, filter).await
    }

    /// Aggregate usage counts.
    pub async fn get_stats(&self) -> Result<UrlStats> {
        self.storage.get_stats().await
    }

    /// Hand the bump to the global manager; never blocks resolution.
    fn record_last_seen(uid: &str) {
        match get_last_seen_manager() {
            Some(manager) => manager.record(uid),
            None => {
                debug!(
                    "Last-seen manager not initialized, skipping bump for uid: {}",
                    uid
                );
            }
        }
    }
}
