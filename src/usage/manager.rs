//! Last-seen tracking for redirects
//!
//! Buffers `last_seen_at` bumps in memory and flushes them to storage in
//! batches, so the redirect hot path never waits on a database write.
//! Supports:
//! - concurrent recording (DashMap, no locks on the hot path)
//! - scheduled flushes on an interval
//! - early flushes once enough UIDs are pending

use dashmap::DashMap;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};
use tracing::{debug, trace, warn};

use chrono::{DateTime, Utc};

use crate::usage::LastSeenSink;

/// Buffer state shared between the manager and its flush tasks.
struct SeenBuffer {
    /// Newest observed timestamp per UID (Arc<str> keys reduce clone cost)
    data: DashMap<Arc<str>, DateTime<Utc>>,
    /// Flush lock, prevents concurrent flushes
    flush_lock: Mutex<()>,
    /// Whether a threshold-triggered flush task is already queued
    flush_pending: AtomicBool,
}

impl SeenBuffer {
    fn new() -> Self {
        Self {
            data: DashMap::new(),
            flush_lock: Mutex::new(()),
            flush_pending: AtomicBool::new(false),
        }
    }

    /// Record a bump, keeping the newest timestamp per UID.
    /// Returns the number of distinct UIDs currently pending.
    fn record(&self, uid: &str, seen_at: DateTime<Utc>) -> usize {
        // Fast path: update an existing key without allocating an Arc.
        // Popular links dominate redirect traffic, so most bumps land here.
        if let Some(mut entry) = self.data.get_mut(uid) {
            if seen_at > *entry {
                *entry = seen_at;
            }
        } else {
            // TOCTOU window between get_mut and entry; worst case is one
            // extra Arc allocation.
            self.data
                .entry(Arc::from(uid))
                .and_modify(|existing| {
                    if seen_at > *existing {
                        *existing = seen_at;
                    }
                })
                .or_insert(seen_at);
        }
        trace!("SeenBuffer: Recorded uid: {}", uid);

        self.data.len()
    }

    /// Collect all pending updates and clear the buffer.
    /// Removes key by key, so bumps recorded after the snapshot survive
    /// for the next flush.
    fn drain(&self) -> Vec<(String, DateTime<Utc>)> {
        let keys: Vec<Arc<str>> = self.data.iter().map(|r| r.key().clone()).collect();

        let mut updates = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some((k, seen_at)) = self.data.remove(&key) {
                updates.push((k.to_string(), seen_at));
            }
        }
        updates
    }

    /// Put updates back after a failed flush. A bump recorded while the
    /// flush was in flight wins when it is newer.
    fn restore(&self, updates: Vec<(String, DateTime<Utc>)>) {
        for (k, seen_at) in updates {
            self.data
                .entry(Arc::from(k.as_str()))
                .and_modify(|existing| {
                    if seen_at > *existing {
                        *existing = seen_at;
                    }
                })
                .or_insert(seen_at);
        }
    }

    /// Number of distinct UIDs currently pending.
    fn len(&self) -> usize {
        self.data.len()
    }
}

/// Collects `last_seen_at` bumps and flushes them to storage in batches.
///
/// State is fully encapsulated in the struct, so tests and multiple
/// instances work without global setup.
#[derive(Clone)]
pub struct LastSeenManager {
    /// Shared buffer state
    buffer: Arc<SeenBuffer>,
    /// Storage backend
    sink: Arc<dyn LastSeenSink>,
    /// Scheduled flush interval
    flush_interval: Duration,
    /// Pending UID count that triggers an early flush
    max_pending_before_flush: usize,
}

impl LastSeenManager {
    pub fn new(
        sink: Arc<dyn LastSeenSink>,
        flush_interval: Duration,
        max_pending_before_flush: usize,
    ) -> Self {
        Self {
            buffer: Arc::new(SeenBuffer::new()),
            sink,
            flush_interval,
            max_pending_before_flush,
        }
    }

    /// Record a resolved redirect for `uid` (thread safe, lock free).
    pub fn record(&self, uid: &str) {
        let pending = self.buffer.record(uid, Utc::now());
        trace!("LastSeenManager: {} UIDs pending", pending);

        // Threshold reached, try to trigger an early flush
        if pending >= self.max_pending_before_flush {
            // compare_exchange keeps concurrent recorders from spawning a
            // task each; only the caller that flips the flag spawns.
            if self
                .buffer
                .flush_pending
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                let buffer = Arc::clone(&self.buffer);
                let sink = Arc::clone(&self.sink);
                tokio::spawn(async move {
                    if let Ok(_guard) = buffer.flush_lock.try_lock() {
                        Self::flush_buffer(&buffer, &sink).await;
                    } else {
                        trace!("LastSeenManager: flush already in progress, skipping");
                    }
                    // Reset the flag either way so the next threshold hit
                    // can trigger again
                    buffer.flush_pending.store(false, Ordering::Release);
                });
            }
        }
    }

    /// Run the scheduled flush loop (spawned as a background task).
    pub async fn start_background_task(&self) {
        loop {
            sleep(self.flush_interval).await;

            debug!("LastSeenManager: Triggering scheduled flush");
            if let Ok(_guard) = self.buffer.flush_lock.try_lock() {
                trace!("LastSeenManager: Starting scheduled flush");
                Self::flush_buffer(&self.buffer, &self.sink).await;
            } else {
                trace!("LastSeenManager: flush already in progress, skipping scheduled flush");
            }
        }
    }

    /// Flush manually, blocking until the batch is written.
    pub async fn flush(&self) {
        debug!("LastSeenManager: Manual flush triggered");
        let _guard = self.buffer.flush_lock.lock().await;
        Self::flush_buffer(&self.buffer, &self.sink).await;
    }

    /// Drain the buffer and hand the batch to the sink.
    async fn flush_buffer(buffer: &SeenBuffer, sink: &Arc<dyn LastSeenSink>) {
        let updates = buffer.drain();

        if updates.is_empty() {
            trace!("LastSeenManager: No last-seen updates to flush");
            return;
        }

        let count = updates.len();
        match sink.flush_last_seen(updates.clone()).await {
            Ok(_) => {
                debug!("LastSeenManager: Successfully flushed {} entries", count);
            }
            Err(e) => {
                // Flush failed, put the batch back
                buffer.restore(updates);
                warn!(
                    "LastSeenManager: flush_last_seen failed: {}, {} entries restored to buffer",
                    e, count
                );
            }
        }
    }

    /// Number of distinct UIDs currently buffered (used for monitoring).
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;

    struct MockSink {
        flushed: std::sync::Mutex<Vec<(String, DateTime<Utc>)>>,
        fail_next: AtomicBool,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                flushed: std::sync::Mutex::new(Vec::new()),
                fail_next: AtomicBool::new(false),
            }
        }

        fn get_flushed(&self) -> Vec<(String, DateTime<Utc>)> {
            self.flushed.lock().unwrap().clone()
        }

        fn flushed_uids(&self) -> HashSet<String> {
            self.flushed
                .lock()
                .unwrap()
                .iter()
                .map(|(uid, _)| uid.clone())
                .collect()
        }

        fn set_fail(&self, fail: bool) {
            self.fail_next.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl LastSeenSink for MockSink {
        async fn flush_last_seen(
            &self,
            updates: Vec<(String, DateTime<Utc>)>,
        ) -> anyhow::Result<()> {
            if self.fail_next.load(Ordering::SeqCst) {
                anyhow::bail!("sink unavailable");
            }
            self.flushed.lock().unwrap().extend(updates);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_record_and_flush() {
        let sink = Arc::new(MockSink::new());
        let manager = LastSeenManager::new(
            Arc::clone(&sink) as Arc<dyn LastSeenSink>,
            Duration::from_secs(60),
            100,
        );

        manager.record("uid1");
        manager.record("uid1");
        manager.record("uid2");

        // buffer_size() counts distinct UIDs, repeated bumps collapse
        assert_eq!(manager.buffer_size(), 2);

        manager.flush().await;

        assert_eq!(manager.buffer_size(), 0);
        let flushed = sink.get_flushed();
        assert_eq!(flushed.len(), 2);
    }

    #[tokio::test]
    async fn test_buffer_keeps_newest_timestamp() {
        let buffer = SeenBuffer::new();
        let older = Utc::now();
        let newer = older + chrono::Duration::seconds(30);

        buffer.record("uid1", older);
        buffer.record("uid1", newer);
        // A stale bump must not clobber the newer one
        buffer.record("uid1", older);

        let drained = buffer.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].1, newer);
    }

    #[tokio::test]
    async fn test_restore_does_not_clobber_newer_bump() {
        let buffer = SeenBuffer::new();
        let older = Utc::now();
        let newer = older + chrono::Duration::seconds(30);

        // A bump recorded while the failed batch was in flight
        buffer.record("uid1", newer);
        buffer.restore(vec![("uid1".to_string(), older)]);

        let drained = buffer.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].1, newer);
    }

    #[tokio::test]
    async fn test_failed_flush_restores_buffer() {
        let sink = Arc::new(MockSink::new());
        let manager = LastSeenManager::new(
            Arc::clone(&sink) as Arc<dyn LastSeenSink>,
            Duration::from_secs(60),
            100,
        );

        manager.record("uid1");
        manager.record("uid2");
        sink.set_fail(true);

        manager.flush().await;

        // Nothing delivered, everything back in the buffer
        assert_eq!(sink.get_flushed().len(), 0);
        assert_eq!(manager.buffer_size(), 2);

        sink.set_fail(false);
        manager.flush().await;

        assert_eq!(manager.buffer_size(), 0);
        assert_eq!(sink.get_flushed().len(), 2);
    }

    /// Concurrent recording must not lose UIDs.
    #[tokio::test]
    async fn test_concurrent_record() {
        let sink = Arc::new(MockSink::new());
        let manager = Arc::new(LastSeenManager::new(
            Arc::clone(&sink) as Arc<dyn LastSeenSink>,
            Duration::from_secs(60),
            100000, // high threshold, no automatic flush
        ));

        const NUM_TASKS: usize = 10;
        const RECORDS_PER_TASK: usize = 1000;
        const DISTINCT_PER_TASK: usize = 50;

        let mut handles = vec![];
        for task in 0..NUM_TASKS {
            let mgr = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                for i in 0..RECORDS_PER_TASK {
                    mgr.record(&format!("task{}-{}", task, i % DISTINCT_PER_TASK));
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(manager.buffer_size(), NUM_TASKS * DISTINCT_PER_TASK);

        manager.flush().await;

        assert_eq!(sink.flushed_uids().len(), NUM_TASKS * DISTINCT_PER_TASK);
    }

    /// Concurrent record + drain must not lose UIDs.
    #[tokio::test]
    async fn test_concurrent_record_and_drain() {
        let sink = Arc::new(MockSink::new());
        let manager = Arc::new(LastSeenManager::new(
            Arc::clone(&sink) as Arc<dyn LastSeenSink>,
            Duration::from_secs(60),
            100000, // high threshold, no automatic flush
        ));

        const NUM_TASKS: usize = 10;
        const RECORDS_PER_TASK: usize = 1000;
        const DISTINCT_PER_TASK: usize = 20;
        const NUM_FLUSHES: usize = 5;

        let mut handles = vec![];
        for task in 0..NUM_TASKS {
            let mgr = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                for i in 0..RECORDS_PER_TASK {
                    mgr.record(&format!("task{}-{}", task, i % DISTINCT_PER_TASK));
                    // Occasional yield to interleave with the drain
                    if rand::random::<u8>() < 10 {
                        tokio::task::yield_now().await;
                    }
                }
            }));
        }

        let mgr_flush = Arc::clone(&manager);
        let flush_handle = tokio::spawn(async move {
            for _ in 0..NUM_FLUSHES {
                tokio::time::sleep(Duration::from_millis(10)).await;
                mgr_flush.flush().await;
            }
        });

        for handle in handles {
            handle.await.unwrap();
        }
        flush_handle.await.unwrap();

        // Final flush drains whatever the interleaved flushes missed
        manager.flush().await;

        assert_eq!(manager.buffer_size(), 0);
        let flushed = sink.flushed_uids();
        assert_eq!(
            flushed.len(),
            NUM_TASKS * DISTINCT_PER_TASK,
            "flushed {} distinct uids, expected {}",
            flushed.len(),
            NUM_TASKS * DISTINCT_PER_TASK
        );
    }
}
