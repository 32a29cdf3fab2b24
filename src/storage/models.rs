use serde::{Deserialize, Serialize};

/// A stored path mapping.
///
/// `path` is always relative to the application origin; validation happens
/// before construction. `last_seen_at` stays `None` until the first
/// successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUrl {
    pub uid: String,
    pub path: String,
    #[serde(default)]
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_seen_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UrlStats {
    pub total_urls: usize,
    /// Resolved at least once (last_seen_at set)
    pub resolved_urls: usize,
    /// Never resolved; candidates for the stale sweep once old enough
    pub never_resolved: usize,
}
