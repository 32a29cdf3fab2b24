use async_trait::async_trait;
use bloomfilter::Bloom;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::debug;

use crate::cache::ExistenceFilter;
use crate::errors::{GotolinkError, Result};

pub struct BloomExistenceFilter {
    inner: Arc<RwLock<Bloom<str>>>,
    /// Buffer collecting keys added while a rebuild is in flight.
    /// Some = rebuild in progress, set() also writes to the buffer
    /// None = no rebuild in progress
    rebuild_buffer: Mutex<Option<Vec<String>>>,
}

impl BloomExistenceFilter {
    pub fn new() -> Result<Self> {
        // Minimal initial capacity; startup rebuilds with the real UID
        // count right away
        let bloom = Bloom::new_for_fp_rate(100, 0.001).map_err(|e| {
            GotolinkError::cache_init(format!("Failed to create bloom filter: {e}"))
        })?;
        Ok(Self {
            inner: Arc::new(RwLock::new(bloom)),
            rebuild_buffer: Mutex::new(None),
        })
    }
}

/// Segmented reserve strategy for the actual bloom filter capacity
/// - < 5000: reserve 50% (small sets need more headroom)
/// - 5000-100000: reserve 20%
/// - > 100000: reserve 10% (capped at 1 million)
fn calculate_capacity(count: usize) -> usize {
    let reserve = if count < 5000 {
        count / 2
    } else if count < 100000 {
        count / 5
    } else {
        (count / 10).min(1_000_000)
    };
    count + reserve.max(1000) // reserve at least 1000
}

#[async_trait]
impl ExistenceFilter for BloomExistenceFilter {
    async fn check(&self, key: &str) -> bool {
        let bloom = self.inner.read();
        bloom.check(key)
    }

    async fn set(&self, key: &str) {
        // Lock order: buffer lock, then inner write lock (same as
        // rebuild, prevents deadlock)
        let mut buffer_guard = self.rebuild_buffer.lock();
        self.inner.write().set(key);
        if let Some(ref mut buffer) = *buffer_guard {
            buffer.push(key.to_string());
        }
    }

    /// Builds the complete new bloom filter outside the lock, then swaps
    /// atomically. Readers see either the old complete filter or the new
    /// complete one, never an empty one. Keys added concurrently during
    /// the rebuild are captured through the buffer, so none are lost.
    async fn rebuild(&self, keys: &[String], fp_rate: f64) -> Result<()> {
        // Enable the buffer to capture concurrent writes
        *self.rebuild_buffer.lock() = Some(Vec::new());

        let capacity = calculate_capacity(keys.len());
        let mut new_bloom = Bloom::new_for_fp_rate(capacity, fp_rate).map_err(|e| {
            // Close the buffer if construction fails
            *self.rebuild_buffer.lock() = None;
            GotolinkError::cache_init(format!("Failed to rebuild bloom filter: {e}"))
        })?;
        for key in keys {
            new_bloom.set(key.as_str());
        }

        // Hold buffer lock -> drain buffer -> swap -> close buffer
        let buffered_count;
        {
            let mut buffer_guard = self.rebuild_buffer.lock();
            if let Some(ref pending) = *buffer_guard {
                buffered_count = pending.len();
                for key in pending {
                    new_bloom.set(key.as_str());
                }
            } else {
                buffered_count = 0;
            }
            *self.inner.write() = new_bloom;
            *buffer_guard = None;
        }

        debug!(
            "Bloom filter rebuilt atomically with {} keys ({} from buffer), capacity: {} (count: {} + reserve: {}), fp_rate: {}",
            keys.len() + buffered_count,
            buffered_count,
            capacity,
            keys.len(),
            capacity - keys.len(),
            fp_rate
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_empty_returns_false() {
        let filter = BloomExistenceFilter::new().unwrap();
        assert!(!filter.check("nonexistent").await);
    }

    #[tokio::test]
    async fn test_set_and_check() {
        let filter = BloomExistenceFilter::new().unwrap();

        filter.set("abc123XY").await;
        assert!(filter.check("abc123XY").await);

        // An unset key should report false (with high probability)
        assert!(!filter.check("other_key").await);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_filter_atomically() {
        let filter = BloomExistenceFilter::new().unwrap();

        filter.set("old_key_1").await;
        filter.set("old_key_2").await;
        assert!(filter.check("old_key_1").await);

        let new_keys = vec!["new_key_a".to_string(), "new_key_b".to_string()];
        filter.rebuild(&new_keys, 0.001).await.unwrap();

        // Old keys are gone
        assert!(!filter.check("old_key_1").await);
        assert!(!filter.check("old_key_2").await);

        // New keys are present
        assert!(filter.check("new_key_a").await);
        assert!(filter.check("new_key_b").await);
    }

    #[tokio::test]
    async fn test_rebuild_empty_key_list() {
        let filter = BloomExistenceFilter::new().unwrap();

        filter.set("leftover").await;
        filter.rebuild(&[], 0.001).await.unwrap();

        assert!(!filter.check("leftover").await);
    }

    #[tokio::test]
    async fn test_false_positive_rate_within_bounds() {
        let filter = BloomExistenceFilter::new().unwrap();

        // Size the filter for 1000 keys (initial capacity is only 100)
        let keys: Vec<String> = (0..1000).map(|i| format!("existing_{}", i)).collect();
        filter.rebuild(&keys, 0.001).await.unwrap();

        for key in &keys {
            assert!(filter.check(key).await, "Key {} should exist", key);
        }

        // Probe 10000 unknown keys and count false positives
        let mut false_positives = 0;
        for i in 0..10000 {
            if filter.check(&format!("nonexistent_{}", i)).await {
                false_positives += 1;
            }
        }

        // fp_rate 0.001 over 10000 probes expects ~10 hits, allow up to
        // 50 (0.5%)
        assert!(
            false_positives < 50,
            "False positive rate too high: {}/10000",
            false_positives
        );
    }

    #[tokio::test]
    async fn test_concurrent_set_and_check() {
        let filter = Arc::new(BloomExistenceFilter::new().unwrap());
        let mut handles = vec![];

        for i in 0..100 {
            let f = Arc::clone(&filter);
            handles.push(tokio::spawn(async move {
                f.set(&format!("concurrent_key_{}", i)).await;
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..100 {
            assert!(
                filter.check(&format!("concurrent_key_{}", i)).await,
                "Key {} should exist after concurrent set",
                i
            );
        }
    }

    #[tokio::test]
    async fn test_concurrent_set_during_rebuild() {
        let filter = Arc::new(BloomExistenceFilter::new().unwrap());

        let keys: Vec<String> = (0..500).map(|i| format!("base_{}", i)).collect();

        let f_rebuild = Arc::clone(&filter);
        let rebuild_keys = keys.clone();
        let rebuild_handle =
            tokio::spawn(async move { f_rebuild.rebuild(&rebuild_keys, 0.001).await });

        let f_set = Arc::clone(&filter);
        let set_handle = tokio::spawn(async move {
            for i in 0..50 {
                f_set.set(&format!("during_{}", i)).await;
                tokio::task::yield_now().await;
            }
        });

        rebuild_handle.await.unwrap().unwrap();
        set_handle.await.unwrap();

        // Keys set concurrently with the rebuild must survive it, whether
        // they landed in the old filter, the buffer, or the new filter
        for i in 0..50 {
            assert!(
                filter.check(&format!("during_{}", i)).await,
                "Key during_{} lost across rebuild",
                i
            );
        }
        for key in &keys {
            assert!(filter.check(key).await);
        }
    }

    #[test]
    fn test_calculate_capacity_segments() {
        // Small sets reserve 50%, floored at 1000
        assert_eq!(calculate_capacity(100), 1100);
        assert_eq!(calculate_capacity(4000), 6000);
        // Mid-size sets reserve 20%
        assert_eq!(calculate_capacity(10000), 12000);
        // Large sets reserve 10%, capped at 1 million
        assert_eq!(calculate_capacity(200000), 220000);
        assert_eq!(calculate_capacity(20_000_000), 21_000_000);
    }
}
