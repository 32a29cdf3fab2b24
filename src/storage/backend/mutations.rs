//! Write operations for SeaOrmStorage

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr};
use tracing::{debug, info, warn};

use super::SeaOrmStorage;
use super::converters::short_url_to_active_model;
use super::retry;
use crate::errors::{GotolinkError, Result};
use crate::storage::ShortUrl;

use migration::entities::short_url;

/// Rows deleted per stale-sweep batch
const STALE_BATCH_SIZE: u64 = 500;

impl SeaOrmStorage {
    /// Insert a new record. Never overwrites: a taken UID is a `Conflict`,
    /// which callers resolve by regenerating.
    pub async fn insert(&self, url: &ShortUrl) -> Result<()> {
        let db = &self.db;
        let active_model = short_url_to_active_model(url);

        let result = retry::with_retry(
            &format!("insert({})", url.uid),
            self.retry_config,
            || async {
                short_url::Entity::insert(active_model.clone())
                    .exec(db)
                    .await
            },
        )
        .await;

        match result {
            Ok(_) => {
                self.invalidate_count_cache();
                Ok(())
            }
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    return Err(GotolinkError::conflict(format!(
                        "UID already taken: {}",
                        url.uid
                    )));
                }
                Err(GotolinkError::database_operation(format!(
                    "failed to insert short URL: {}",
                    e
                )))
            }
        }
    }

    pub async fn remove(&self, uid: &str) -> Result<()> {
        let db = &self.db;
        let uid_owned = uid.to_string();

        let result = retry::with_retry(&format!("remove({})", uid), self.retry_config, || async {
            short_url::Entity::delete_by_id(&uid_owned).exec(db).await
        })
        .await
        .map_err(|e| GotolinkError::database_operation(format!("failed to delete short URL: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(GotolinkError::not_found(format!(
                "short URL not found: {}",
                uid
            )));
        }

        self.invalidate_count_cache();
        info!("Short URL deleted: {}", uid);
        Ok(())
    }

    /// Delete never-resolved records created before `older_than`.
    ///
    /// Runs in batches to keep transactions short. Returns the number of
    /// deleted rows.
    pub async fn delete_stale(&self, older_than: DateTime<Utc>) -> Result<u64> {
        let db = &self.db;

        let mut total_deleted = 0u64;
        let mut iterations = 0;
        let max_iterations = 1000;

        loop {
            if iterations >= max_iterations {
                warn!(
                    "Stale sweep reached max iterations {} (deleted {} rows)",
                    max_iterations, total_deleted
                );
                break;
            }

            let uids_to_delete: Vec<String> = short_url::Entity::find()
                .select_only()
                .column(short_url::Column::Uid)
                .filter(short_url::Column::LastSeenAt.is_null())
                .filter(short_url::Column::CreatedAt.lt(older_than))
                .order_by_asc(short_url::Column::Uid)
                .limit(STALE_BATCH_SIZE)
                .into_tuple()
                .all(db)
                .await
                .map_err(|e| {
                    GotolinkError::database_operation(format!("stale sweep select failed: {}", e))
                })?;

            if uids_to_delete.is_empty() {
                break;
            }

            let deleted = short_url::Entity::delete_many()
                .filter(short_url::Column::Uid.is_in(uids_to_delete.clone()))
                .exec(db)
                .await
                .map_err(|e| {
                    GotolinkError::database_operation(format!("stale sweep delete failed: {}", e))
                })?
                .rows_affected;

            total_deleted += deleted;
            iterations += 1;

            debug!(
                "Stale sweep batch {}: deleted {} rows (total {})",
                iterations, deleted, total_deleted
            );

            if deleted < STALE_BATCH_SIZE {
                break;
            }

            // Brief pause between batches to keep pressure off the database
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }

        if total_deleted > 0 {
            self.invalidate_count_cache();
        }
        Ok(total_deleted)
    }
}
