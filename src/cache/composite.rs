use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::{CacheResult, CompositeCacheTrait, ExistenceFilter, ObjectCache};
use crate::errors::Result;
use crate::storage::ShortUrl;

/// Two-layer read path: an existence filter guarding an object cache.
pub struct CompositeCache {
    l1: Arc<dyn ExistenceFilter>,
    l2: Arc<dyn ObjectCache>,
}

impl CompositeCache {
    pub fn new(l1: Arc<dyn ExistenceFilter>, l2: Arc<dyn ObjectCache>) -> Self {
        Self { l1, l2 }
    }
}

#[async_trait]
impl CompositeCacheTrait for CompositeCache {
    async fn get(&self, key: &str) -> CacheResult {
        if !self.l1.check(key).await {
            return CacheResult::NotFound;
        }
        self.l2.get(key).await
    }

    async fn insert(&self, key: String, value: ShortUrl) {
        self.l1.set(&key).await;
        self.l2.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        // The bloom filter cannot forget a key; it keeps reporting this
        // UID as present until the next rebuild
        self.l2.remove(key).await;
    }

    async fn rebuild_filter(&self, keys: &[String], fp_rate: f64) -> Result<()> {
        // Drop cached objects before the swap so deleted UIDs cannot be
        // served from L2 while the old filter still carries them
        self.l2.invalidate_all().await;
        self.l1.rebuild(keys, fp_rate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::existence_filter::BloomExistenceFilter;
    use crate::cache::object_cache::MokaObjectCache;
    use chrono::Utc;
    use std::time::Duration;

    fn test_url(uid: &str) -> ShortUrl {
        ShortUrl {
            uid: uid.to_string(),
            path: "d/abc/dashboard".to_string(),
            created_by: 1,
            created_at: Utc::now(),
            last_seen_at: None,
        }
    }

    fn build_composite() -> CompositeCache {
        let l1 = Arc::new(BloomExistenceFilter::new().unwrap());
        let l2 = Arc::new(MokaObjectCache::new(1000, Duration::from_secs(60)));
        CompositeCache::new(l1, l2)
    }

    #[tokio::test]
    async fn test_get_unknown_uid_is_not_found() {
        let cache = build_composite();
        assert!(matches!(cache.get("missing").await, CacheResult::NotFound));
    }

    #[tokio::test]
    async fn test_insert_then_get_returns_value() {
        let cache = build_composite();
        cache.insert("abc123XY".to_string(), test_url("abc123XY")).await;

        match cache.get("abc123XY").await {
            CacheResult::Found(url) => assert_eq!(url.uid, "abc123XY"),
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_filter_hit_with_cold_object_cache() {
        let cache = build_composite();
        // Filter knows the UID, the object cache has never seen it
        cache
            .rebuild_filter(&["abc123XY".to_string()], 0.001)
            .await
            .unwrap();

        assert!(matches!(
            cache.get("abc123XY").await,
            CacheResult::ExistsButNoValue
        ));
    }

    #[tokio::test]
    async fn test_remove_only_evicts_object_cache() {
        let cache = build_composite();
        cache.insert("abc123XY".to_string(), test_url("abc123XY")).await;
        cache.remove("abc123XY").await;

        // The filter still claims existence, the value is gone
        assert!(matches!(
            cache.get("abc123XY").await,
            CacheResult::ExistsButNoValue
        ));
    }

    #[tokio::test]
    async fn test_rebuild_filter_forgets_removed_uids() {
        let cache = build_composite();
        cache.insert("gone1234".to_string(), test_url("gone1234")).await;
        cache.insert("kept1234".to_string(), test_url("kept1234")).await;

        cache
            .rebuild_filter(&["kept1234".to_string()], 0.001)
            .await
            .unwrap();

        assert!(matches!(cache.get("gone1234").await, CacheResult::NotFound));
        // Survivor stays known to the filter; its object entry was dropped
        assert!(matches!(
            cache.get("kept1234").await,
            CacheResult::ExistsButNoValue
        ));
    }
}
