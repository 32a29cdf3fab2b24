//! LastSeenSink implementation for SeaOrmStorage
//!
//! Flushes buffered last-seen bumps as one batched UPDATE. UIDs are
//! shape-validated via `utils::is_valid_uid()` before any SQL is built;
//! the statement itself is parameterized through `DatabaseBackend::build()`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{CaseStatement, Expr, Query};
use sea_orm::{ConnectionTrait, ExprTrait};
use tracing::debug;

use super::SeaOrmStorage;
use super::retry;
use crate::usage::LastSeenSink;
use crate::utils::is_valid_uid;

use migration::entities::short_url;

#[async_trait]
impl LastSeenSink for SeaOrmStorage {
    async fn flush_last_seen(&self, updates: Vec<(String, DateTime<Utc>)>) -> anyhow::Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        for (uid, _) in &updates {
            if !is_valid_uid(uid) {
                return Err(anyhow::anyhow!(
                    "Invalid UID shape detected: '{}' - refusing to execute SQL",
                    uid
                ));
            }
        }

        let total_count = updates.len();

        // CASE WHEN keeps this a single round trip across all three backends
        let mut case_stmt = CaseStatement::new();
        let mut uids: Vec<String> = Vec::with_capacity(total_count);

        for (uid, seen_at) in &updates {
            case_stmt = case_stmt.case(
                Expr::col(short_url::Column::Uid).eq(Expr::val(uid.as_str())),
                Expr::val(*seen_at),
            );
            uids.push(uid.clone());
        }
        // Rows outside the batch keep their current value
        case_stmt = case_stmt.finally(Expr::col(short_url::Column::LastSeenAt));

        let stmt = Query::update()
            .table(short_url::Entity)
            .value(short_url::Column::LastSeenAt, case_stmt)
            .and_where(Expr::col(short_url::Column::Uid).is_in(uids))
            .to_owned();

        let db = &self.db;
        let stmt_ref = &stmt;
        retry::with_retry("flush_last_seen", self.retry_config, || async {
            db.execute(stmt_ref).await
        })
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to batch update last_seen_at (still failed after retries): {}",
                e
            )
        })?;

        debug!(
            "last_seen_at flushed to {} database ({} records)",
            self.backend_name.to_uppercase(),
            total_count
        );

        Ok(())
    }
}
