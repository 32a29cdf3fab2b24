//! Null (no-op) implementation of CompositeCacheTrait
//!
//! Used when `cache.cache_type = "none"`: every lookup falls through to
//! storage.

use std::sync::Arc;

use async_trait::async_trait;

use super::traits::{CacheResult, CompositeCacheTrait};
use crate::errors::Result;
use crate::storage::ShortUrl;

/// A no-op composite cache.
///
/// All reads return `CacheResult::ExistsButNoValue` (conservative: "might
/// exist") so callers always consult storage; all writes are ignored.
pub struct NullCompositeCache;

impl NullCompositeCache {
    pub fn arc() -> Arc<dyn CompositeCacheTrait> {
        Arc::new(Self)
    }
}

#[async_trait]
impl CompositeCacheTrait for NullCompositeCache {
    async fn get(&self, _key: &str) -> CacheResult {
        CacheResult::ExistsButNoValue
    }
    async fn insert(&self, _key: String, _value: ShortUrl) {}
    async fn remove(&self, _key: &str) {}
    async fn rebuild_filter(&self, _keys: &[String], _fp_rate: f64) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_get_falls_through() {
        let cache = NullCompositeCache;
        assert!(matches!(
            cache.get("any-key").await,
            CacheResult::ExistsButNoValue
        ));
    }

    #[tokio::test]
    async fn test_null_cache_operations_dont_panic() {
        let cache = NullCompositeCache;
        let url = ShortUrl {
            uid: "abc123XY".to_string(),
            path: "d/abc/dashboard".to_string(),
            created_by: 0,
            created_at: chrono::Utc::now(),
            last_seen_at: None,
        };
        cache.insert("abc123XY".to_string(), url).await;
        cache.remove("abc123XY").await;
        cache.rebuild_filter(&["abc123XY".to_string()], 0.001).await.unwrap();
        assert!(matches!(
            cache.get("abc123XY").await,
            CacheResult::ExistsButNoValue
        ));
    }
}
