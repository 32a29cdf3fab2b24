//! Admin API handlers for short URL management

use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, trace};

use crate::api::response::{api_result, error_from_gotolink, success_response};
use crate::config::get_config;
use crate::services::{CreateShortUrlRequest, ShortUrlService};
use crate::storage::{ShortUrl, UrlFilter};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateShortUrlBody {
    pub path: String,
}

/// Payload returned from a create: the allocated UID plus the ready-made
/// redirect URL
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateShortUrlResponse {
    pub uid: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortUrlResponse {
    pub uid: String,
    pub path: String,
    pub created_by: i64,
    pub created_at: String,
    pub last_seen_at: Option<String>,
}

impl From<ShortUrl> for ShortUrlResponse {
    fn from(record: ShortUrl) -> Self {
        Self {
            uid: record.uid,
            path: record.path,
            created_by: record.created_by,
            created_at: record.created_at.to_rfc3339(),
            last_seen_at: record.last_seen_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GetShortUrlsQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub search: Option<String>,
    pub created_by: Option<i64>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub only_never_resolved: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortUrlListData {
    pub items: Vec<ShortUrlResponse>,
    pub pagination: PaginationInfo,
}

/// Creator identity from the `X-User-Id` header, `0` when absent.
/// The header is trusted as-is; a fronting proxy is expected to set it.
fn created_by_from_headers(req: &HttpRequest) -> i64 {
    req.headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

fn parse_rfc3339(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Create a short URL for a relative path
pub async fn create_short_url(
    req: HttpRequest,
    body: web::Json<CreateShortUrlBody>,
    service: web::Data<Arc<ShortUrlService>>,
) -> ActixResult<impl Responder> {
    let created_by = created_by_from_headers(&req);
    info!(
        "Admin API: create short URL request - path: {}, created_by: {}",
        body.path, created_by
    );

    let request = CreateShortUrlRequest {
        path: body.path.clone(),
        created_by,
    };

    match service.create_short_url(request).await {
        Ok(record) => {
            let config = get_config();
            let url = format!(
                "{}/goto/{}",
                config.server.public_url.trim_end_matches('/'),
                record.uid
            );
            Ok(success_response(CreateShortUrlResponse {
                uid: record.uid,
                url,
            }))
        }
        Err(e) => {
            error!("Admin API: failed to create short URL: {}", e);
            Ok(error_from_gotolink(&e))
        }
    }
}

/// List short URLs with pagination and filters
pub async fn get_short_urls(
    query: web::Query<GetShortUrlsQuery>,
    service: web::Data<Arc<ShortUrlService>>,
) -> ActixResult<impl Responder> {
    trace!(
        "Admin API: request to list short URLs with filters: {:?}",
        query
    );

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);

    // Unparseable date filters are dropped rather than rejected
    let filter = UrlFilter {
        search: query.search.clone().filter(|s| !s.is_empty()),
        created_by: query.created_by,
        created_after: parse_rfc3339(query.created_after.as_deref()),
        created_before: parse_rfc3339(query.created_before.as_deref()),
        only_never_resolved: query.only_never_resolved.unwrap_or(false),
    };

    match service.list_short_urls(filter, page, page_size).await {
        Ok((records, total)) => {
            let total_pages = total.div_ceil(page_size);
            let items: Vec<ShortUrlResponse> =
                records.into_iter().map(ShortUrlResponse::from).collect();

            info!(
                "Admin API: returning {} short URLs (page {} of {}, total: {})",
                items.len(),
                page,
                total_pages,
                total
            );

            Ok(success_response(ShortUrlListData {
                items,
                pagination: PaginationInfo {
                    page,
                    page_size,
                    total,
                    total_pages,
                },
            }))
        }
        Err(e) => {
            error!("Admin API: failed to list short URLs: {}", e);
            Ok(error_from_gotolink(&e))
        }
    }
}

/// Aggregate usage counts
pub async fn get_stats(service: web::Data<Arc<ShortUrlService>>) -> ActixResult<impl Responder> {
    trace!("Admin API: stats request");
    Ok(api_result(service.get_stats().await))
}

/// Fetch one record without bumping its last-seen timestamp
pub async fn get_short_url(
    uid: web::Path<String>,
    service: web::Data<Arc<ShortUrlService>>,
) -> ActixResult<impl Responder> {
    info!("Admin API: get short URL request - uid: {}", uid);

    Ok(api_result(
        service
            .get_short_url(&uid)
            .await
            .map(ShortUrlResponse::from),
    ))
}

/// Delete a record and evict it from the cache
pub async fn delete_short_url(
    uid: web::Path<String>,
    service: web::Data<Arc<ShortUrlService>>,
) -> ActixResult<impl Responder> {
    info!("Admin API: delete short URL request - uid: {}", uid);

    match service.delete_short_url(&uid).await {
        Ok(()) => Ok(success_response(serde_json::json!({
            "message": "Short URL deleted successfully"
        }))),
        Err(e) => {
            error!("Admin API: failed to delete short URL - {}: {}", uid, e);
            Ok(error_from_gotolink(&e))
        }
    }
}

/// Short URL management routes `/short-urls`
///
/// - GET/HEAD /short-urls - paginated listing
/// - POST /short-urls - create
/// - GET /short-urls/stats - aggregate counts
/// - GET/HEAD /short-urls/{uid} - fetch one record
/// - DELETE /short-urls/{uid} - delete
pub fn short_url_routes() -> actix_web::Scope {
    web::scope("/short-urls")
        .route("", web::get().to(get_short_urls))
        .route("", web::head().to(get_short_urls))
        .route("", web::post().to(create_short_url))
        // /stats must be registered before /{uid}
        .route("/stats", web::get().to(get_stats))
        .route("/{uid}", web::get().to(get_short_url))
        .route("/{uid}", web::head().to(get_short_url))
        .route("/{uid}", web::delete().to(delete_short_url))
}
