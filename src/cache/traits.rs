use crate::errors::Result;
use crate::storage::ShortUrl;
use async_trait::async_trait;

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub enum CacheResult {
    /// The key definitely does not exist
    NotFound,
    /// The key may exist, but no value is cached
    ExistsButNoValue,
    /// Cached value found
    Found(ShortUrl),
}

#[async_trait]
pub trait CompositeCacheTrait: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult;
    async fn insert(&self, key: String, value: ShortUrl);
    async fn remove(&self, key: &str);

    /// Rebuild the existence filter from the authoritative UID list and
    /// drop all cached objects.
    async fn rebuild_filter(&self, keys: &[String], fp_rate: f64) -> Result<()>;
}

#[async_trait]
pub trait ExistenceFilter: Send + Sync {
    /// Probabilistic membership check, consulted before the backend.
    /// - `false` means the key **definitely does not exist**
    /// - `true` means the key **may exist**
    async fn check(&self, key: &str) -> bool;

    /// Add a key to the filter.
    async fn set(&self, key: &str);

    /// Replace the filter with a fresh one sized for `keys`, atomically.
    async fn rebuild(&self, keys: &[String], fp_rate: f64) -> Result<()>;
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult;
    async fn insert(&self, key: String, value: ShortUrl);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}
