//! SeaORM storage backend
//!
//! Database persistence for short URL records, supporting SQLite,
//! MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod last_seen_sink;
mod mutations;
mod query;
pub mod retry;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{GotolinkError, Result};
use crate::usage::LastSeenSink;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_short_url, short_url_to_active_model};

/// Infer the database flavor from a connection URL
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(GotolinkError::database_config(format!(
            "cannot infer database type from URL: {}. Supported schemes: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// Listing filter for the admin surface
#[derive(Default, Clone, Debug)]
pub struct UrlFilter {
    /// Substring match on the stored path
    pub search: Option<String>,
    /// Records created by this principal
    pub created_by: Option<i64>,
    /// created_at >= created_after
    pub created_after: Option<DateTime<Utc>>,
    /// created_at <= created_before
    pub created_before: Option<DateTime<Utc>>,
    /// Only records that have never been resolved
    pub only_never_resolved: bool,
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// Pagination COUNT cache (30s TTL)
    count_cache: Cache<String, u64>,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(GotolinkError::database_config(
                "database.database_url is not set".to_string(),
            ));
        }

        let config = crate::config::get_config();
        let retry_config = retry::RetryConfig {
            max_retries: config.database.retry_count,
            base_delay_ms: config.database.retry_base_delay_ms,
            max_delay_ms: config.database.retry_max_delay_ms,
        };

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            count_cache: Cache::builder()
                .time_to_live(Duration::from_secs(30))
                .max_capacity(100)
                .build(),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn as_last_seen_sink(&self) -> Arc<dyn LastSeenSink> {
        Arc::new(self.clone()) as Arc<dyn LastSeenSink>
    }

    /// Direct connection handle for callers that need raw access
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Drop the pagination COUNT cache (call after any mutation)
    pub fn invalidate_count_cache(&self) {
        self.count_cache.invalidate_all();
    }
}
