//! ShortUrlService tests
//!
//! Exercises the shared business logic (validation, UID allocation,
//! resolution) over a temporary SQLite database with the null cache, the
//! same wiring the CLI uses.

use std::sync::Arc;
use std::sync::Once;

use gotolink::cache::NullCompositeCache;
use gotolink::config::init_config;
use gotolink::errors::GotolinkError;
use gotolink::services::{CreateShortUrlRequest, ShortUrlService};
use gotolink::storage::{SeaOrmStorage, UrlFilter};
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_test_service() -> (ShortUrlService, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("service_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    let service = ShortUrlService::new(Arc::new(storage), NullCompositeCache::arc());
    (service, temp_dir)
}

fn create_request(path: &str) -> CreateShortUrlRequest {
    CreateShortUrlRequest {
        path: path.to_string(),
        created_by: 0,
    }
}

// =============================================================================
// Create tests
// =============================================================================

#[cfg(test)]
mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_returns_record() {
        let (service, _temp) = create_test_service().await;

        let record = service
            .create_short_url(create_request("d/abc/my-dashboard?orgId=1"))
            .await
            .expect("create should succeed");

        assert_eq!(record.path, "d/abc/my-dashboard?orgId=1");
        assert_eq!(record.created_by, 0);
        assert!(record.last_seen_at.is_none());
    }

    #[tokio::test]
    async fn test_uid_has_configured_length_and_charset() {
        let (service, _temp) = create_test_service().await;

        let record = service
            .create_short_url(create_request("d/abc"))
            .await
            .unwrap();

        assert_eq!(record.uid.len(), 8);
        assert!(record.uid.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_create_records_creator() {
        let (service, _temp) = create_test_service().await;

        let record = service
            .create_short_url(CreateShortUrlRequest {
                path: "d/abc".to_string(),
                created_by: 42,
            })
            .await
            .unwrap();

        assert_eq!(record.created_by, 42);
    }

    #[tokio::test]
    async fn test_same_path_gets_distinct_uids() {
        let (service, _temp) = create_test_service().await;

        let first = service
            .create_short_url(create_request("d/same/path"))
            .await
            .unwrap();
        let second = service
            .create_short_url(create_request("d/same/path"))
            .await
            .unwrap();

        assert_ne!(first.uid, second.uid);
        assert_eq!(first.path, second.path);
    }

    #[tokio::test]
    async fn test_create_trims_whitespace() {
        let (service, _temp) = create_test_service().await;

        let record = service
            .create_short_url(create_request("  d/abc  "))
            .await
            .unwrap();

        assert_eq!(record.path, "d/abc");
    }
}

// =============================================================================
// Validation tests
// =============================================================================

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_absolute_path_rejected() {
        let (service, _temp) = create_test_service().await;

        let err = service
            .create_short_url(create_request("/etc/passwd"))
            .await
            .expect_err("absolute path must be rejected");
        assert!(matches!(err, GotolinkError::AbsolutePath(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_protocol_relative_path_rejected() {
        let (service, _temp) = create_test_service().await;

        let err = service
            .create_short_url(create_request("//evil.example/phish"))
            .await
            .expect_err("protocol-relative path must be rejected");
        assert!(matches!(err, GotolinkError::AbsolutePath(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_parent_traversal_rejected() {
        let (service, _temp) = create_test_service().await;

        for path in ["../admin", "a/../../b", ".."] {
            let err = service
                .create_short_url(create_request(path))
                .await
                .expect_err("traversal must be rejected");
            assert!(matches!(err, GotolinkError::InvalidPath(_)), "got {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_full_url_rejected() {
        let (service, _temp) = create_test_service().await;

        for path in ["http://evil.example", "https://evil.example/x", "javascript:alert(1)"] {
            let err = service
                .create_short_url(create_request(path))
                .await
                .expect_err("full URL must be rejected");
            assert!(matches!(err, GotolinkError::InvalidPath(_)), "got {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_empty_path_rejected() {
        let (service, _temp) = create_test_service().await;

        for path in ["", "   "] {
            let err = service
                .create_short_url(create_request(path))
                .await
                .expect_err("empty path must be rejected");
            assert!(matches!(err, GotolinkError::InvalidPath(_)), "got {:?}", err);
        }
    }
}

// =============================================================================
// Resolution tests
// =============================================================================

#[cfg(test)]
mod resolution_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_resolve() {
        let (service, _temp) = create_test_service().await;

        let created = service
            .create_short_url(create_request("d/abc/target?x=1"))
            .await
            .unwrap();

        let resolved = service.resolve(&created.uid).await.expect("must resolve");
        assert_eq!(resolved.path, "d/abc/target?x=1");
        assert_eq!(resolved.uid, created.uid);
    }

    #[tokio::test]
    async fn test_resolve_unknown_uid_is_not_found() {
        let (service, _temp) = create_test_service().await;

        let err = service.resolve("noSuchId").await.expect_err("must fail");
        assert!(matches!(err, GotolinkError::NotFound(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_resolve_malformed_uid_is_not_found() {
        let (service, _temp) = create_test_service().await;

        // Shape check rejects these before storage is consulted
        for uid in ["abc/def", "a b", "uid'; --", ""] {
            let err = service.resolve(uid).await.expect_err("must fail");
            assert!(matches!(err, GotolinkError::NotFound(_)), "got {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_get_short_url_without_usage_bump() {
        let (service, _temp) = create_test_service().await;

        let created = service
            .create_short_url(create_request("d/abc"))
            .await
            .unwrap();

        let fetched = service.get_short_url(&created.uid).await.unwrap();
        assert_eq!(fetched.uid, created.uid);
        assert!(fetched.last_seen_at.is_none());
    }
}

// =============================================================================
// Delete tests
// =============================================================================

#[cfg(test)]
mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_then_resolve_fails() {
        let (service, _temp) = create_test_service().await;

        let created = service
            .create_short_url(create_request("d/doomed"))
            .await
            .unwrap();

        service
            .delete_short_url(&created.uid)
            .await
            .expect("delete should succeed");

        let err = service.resolve(&created.uid).await.expect_err("must fail");
        assert!(matches!(err, GotolinkError::NotFound(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_delete_unknown_uid_is_not_found() {
        let (service, _temp) = create_test_service().await;

        let err = service
            .delete_short_url("noSuchId")
            .await
            .expect_err("must fail");
        assert!(matches!(err, GotolinkError::NotFound(_)), "got {:?}", err);
    }
}

// =============================================================================
// Listing and stats tests
// =============================================================================

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_with_pagination() {
        let (service, _temp) = create_test_service().await;

        for i in 0..5 {
            service
                .create_short_url(create_request(&format!("d/dash{}", i)))
                .await
                .unwrap();
        }

        let (page1, total) = service
            .list_short_urls(UrlFilter::default(), 1, 2)
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(page1.len(), 2);

        let (page3, _) = service
            .list_short_urls(UrlFilter::default(), 3, 2)
            .await
            .unwrap();
        assert_eq!(page3.len(), 1);
    }

    #[tokio::test]
    async fn test_list_clamps_page_and_size() {
        let (service, _temp) = create_test_service().await;

        service.create_short_url(create_request("d/a")).await.unwrap();

        // page 0 is treated as page 1, size 0 as size 1
        let (records, total) = service
            .list_short_urls(UrlFilter::default(), 0, 0)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_list_with_search_filter() {
        let (service, _temp) = create_test_service().await;

        service.create_short_url(create_request("d/alpha/one")).await.unwrap();
        service.create_short_url(create_request("d/beta/two")).await.unwrap();

        let filter = UrlFilter {
            search: Some("beta".to_string()),
            ..Default::default()
        };
        let (records, total) = service.list_short_urls(filter, 1, 20).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(records[0].path, "d/beta/two");
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let (service, _temp) = create_test_service().await;

        service.create_short_url(create_request("d/a")).await.unwrap();
        service.create_short_url(create_request("d/b")).await.unwrap();

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.total_urls, 2);
        assert_eq!(stats.resolved_urls, 0);
        assert_eq!(stats.never_resolved, 2);
    }
}
