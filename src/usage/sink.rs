use chrono::{DateTime, Utc};

/// Receives batched `last_seen_at` updates drained from the in-memory buffer.
#[async_trait::async_trait]
pub trait LastSeenSink: Send + Sync {
    async fn flush_last_seen(&self, updates: Vec<(String, DateTime<Utc>)>) -> anyhow::Result<()>;
}
