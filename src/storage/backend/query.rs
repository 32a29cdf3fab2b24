//! Read-only operations for SeaOrmStorage

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, ExprTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use tracing::{debug, error, info};

use super::{SeaOrmStorage, UrlFilter, retry};
use crate::errors::Result;
use crate::storage::ShortUrl;
use crate::storage::models::UrlStats;

use migration::entities::short_url;

use super::converters::model_to_short_url;

/// Aggregate row for the stats query
#[derive(Debug, FromQueryResult)]
struct StatsResult {
    total_urls: i64,
    resolved_urls: Option<i64>,
}

impl SeaOrmStorage {
    pub async fn get(&self, uid: &str) -> Option<ShortUrl> {
        let db = &self.db;
        let uid_owned = uid.to_string();

        let result = retry::with_retry(&format!("get({})", uid), self.retry_config, || async {
            short_url::Entity::find_by_id(&uid_owned).one(db).await
        })
        .await;

        match result {
            Ok(Some(model)) => Some(model_to_short_url(model)),
            Ok(None) => None,
            Err(e) => {
                error!("Short URL lookup failed (retries exhausted): {}", e);
                None
            }
        }
    }

    /// Existence probe without materializing the row
    pub async fn exists(&self, uid: &str) -> bool {
        let db = &self.db;
        let uid_owned = uid.to_string();

        let result = retry::with_retry(&format!("exists({})", uid), self.retry_config, || async {
            short_url::Entity::find_by_id(&uid_owned)
                .select_only()
                .column(short_url::Column::Uid)
                .into_tuple::<String>()
                .one(db)
                .await
        })
        .await;

        match result {
            Ok(found) => found.is_some(),
            Err(e) => {
                // Errors fall through to the insert, which reports them
                error!("Short URL existence check failed: {}", e);
                false
            }
        }
    }

    /// Load every UID (existence filter warmup and rebuilds).
    ///
    /// Errors propagate: rebuilding the filter from a partial or empty
    /// list would make live UIDs unresolvable.
    pub async fn load_all_uids(&self) -> Result<Vec<String>> {
        let db = &self.db;

        let uids: Vec<String> =
            retry::with_retry("load_all_uids", self.retry_config, || async {
                short_url::Entity::find()
                    .select_only()
                    .column(short_url::Column::Uid)
                    .into_tuple::<String>()
                    .all(db)
                    .await
            })
            .await?;

        info!("Loaded {} UIDs for the existence filter", uids.len());
        Ok(uids)
    }

    /// Paginated listing with filters (COUNT cached for 30s)
    pub async fn list_paginated(
        &self,
        page: u64,
        page_size: u64,
        filter: UrlFilter,
    ) -> Result<(Vec<ShortUrl>, u64)> {
        let cache_key = format!(
            "count:s={:?}:u={:?}:a={:?}:b={:?}:n={}",
            filter.search,
            filter.created_by,
            filter.created_after.map(|d| d.timestamp()),
            filter.created_before.map(|d| d.timestamp()),
            filter.only_never_resolved
        );

        let condition = build_filter_condition(&filter);

        let total = if let Some(cached) = self.count_cache.get(&cache_key) {
            debug!("count cache hit: key={}, value={}", cache_key, cached);
            cached
        } else {
            let db = &self.db;
            let cond = condition.clone();
            let count =
                retry::with_retry("list_paginated(count)", self.retry_config, || async {
                    short_url::Entity::find()
                        .filter(cond.clone())
                        .count(db)
                        .await
                })
                .await?;

            self.count_cache.insert(cache_key, count);
            count
        };

        let db = &self.db;
        let page_offset = page.saturating_sub(1);
        let models = retry::with_retry("list_paginated(data)", self.retry_config, || async {
            short_url::Entity::find()
                .filter(condition.clone())
                .order_by_desc(short_url::Column::CreatedAt)
                .paginate(db, page_size)
                .fetch_page(page_offset)
                .await
        })
        .await?;

        let urls: Vec<ShortUrl> = models.into_iter().map(model_to_short_url).collect();
        Ok((urls, total))
    }

    /// Aggregate counts in a single grouped query
    pub async fn get_stats(&self) -> Result<UrlStats> {
        let result = short_url::Entity::find()
            .select_only()
            .column_as(short_url::Column::Uid.count(), "total_urls")
            // SUM(CASE WHEN last_seen_at IS NOT NULL THEN 1 ELSE 0 END)
            .column_as(
                Expr::case(
                    Condition::all().add(short_url::Column::LastSeenAt.is_not_null()),
                    1,
                )
                .finally(0)
                .sum(),
                "resolved_urls",
            )
            .into_model::<StatsResult>()
            .one(&self.db)
            .await?;

        match result {
            Some(stats) => {
                let total = Ord::max(stats.total_urls, 0) as usize;
                let resolved = Ord::max(stats.resolved_urls.unwrap_or(0), 0) as usize;
                Ok(UrlStats {
                    total_urls: total,
                    resolved_urls: resolved,
                    never_resolved: total.saturating_sub(resolved),
                })
            }
            None => Ok(UrlStats::default()),
        }
    }

    /// Total number of stored records (health probe)
    pub async fn count(&self) -> Result<u64> {
        let db = &self.db;

        let count = retry::with_retry("count", self.retry_config, || async {
            short_url::Entity::find().count(db).await
        })
        .await?;

        Ok(count)
    }

    /// Count rows `delete_stale` would remove, without deleting anything.
    pub async fn count_stale(&self, older_than: DateTime<Utc>) -> Result<u64> {
        let db = &self.db;

        let count = retry::with_retry("count_stale", self.retry_config, || async {
            short_url::Entity::find()
                .filter(short_url::Column::LastSeenAt.is_null())
                .filter(short_url::Column::CreatedAt.lt(older_than))
                .count(db)
                .await
        })
        .await?;

        Ok(count)
    }
}

fn build_filter_condition(filter: &UrlFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(ref search) = filter.search {
        condition = condition.add(
            Condition::any()
                .add(short_url::Column::Uid.contains(search))
                .add(short_url::Column::Path.contains(search)),
        );
    }

    if let Some(created_by) = filter.created_by {
        condition = condition.add(short_url::Column::CreatedBy.eq(created_by));
    }

    if let Some(ref after) = filter.created_after {
        condition = condition.add(short_url::Column::CreatedAt.gte(*after));
    }

    if let Some(ref before) = filter.created_before {
        condition = condition.add(short_url::Column::CreatedAt.lte(*before));
    }

    if filter.only_never_resolved {
        condition = condition.add(short_url::Column::LastSeenAt.is_null());
    }

    condition
}
