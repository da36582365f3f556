//! Cookie manager integration tests.
//!
//! Every scenario runs against both the in-memory store and the
//! task-hosted store, since callers must not be able to tell them apart.

use cookiekit::base::neterror::NetError;
use cookiekit::cookies::canonical_cookie::{CanonicalCookie, SameSite};
use cookiekit::cookies::manager::CookieManager;
use cookiekit::cookies::monster::CookieMonster;
use cookiekit::cookies::service::{CookieStoreService, DEFAULT_QUEUE_DEPTH};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use url::Url;

fn managers() -> Vec<(&'static str, CookieManager)> {
    let (service, _task) = CookieStoreService::spawn(CookieMonster::new(), DEFAULT_QUEUE_DEPTH);
    vec![
        ("in-memory", CookieManager::in_memory()),
        ("service", CookieManager::new(Arc::new(service))),
    ]
}

fn test_cookie() -> CanonicalCookie {
    CanonicalCookie::builder("TestCookie", "ThisisTestCookie")
        .domain("example.com")
        .path("/")
        .expires(OffsetDateTime::now_utc() + Duration::seconds(60))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_fresh_store_lists_nothing() {
    for (label, manager) in managers() {
        assert!(manager.list().await.unwrap().is_empty(), "{label}");
    }
}

#[tokio::test]
async fn test_add_then_list_then_delete() {
    for (label, manager) in managers() {
        let cookie = test_cookie();
        manager.add(cookie.clone()).await.unwrap();

        let listed = manager.list().await.unwrap();
        assert_eq!(listed, vec![cookie.clone()], "{label}");

        manager.delete(&cookie).await.unwrap();
        let listed = manager.list().await.unwrap();
        assert!(!listed.iter().any(|c| c.matches_key(&cookie.key())), "{label}");
    }
}

#[tokio::test]
async fn test_add_keeps_every_attribute() {
    for (label, manager) in managers() {
        let cookie = CanonicalCookie::builder("prefs", "")
            .domain(".example.org")
            .path("/settings")
            .secure(true)
            .http_only(true)
            .same_site(SameSite::Strict)
            .version(1)
            .build()
            .unwrap();
        manager.add(cookie.clone()).await.unwrap();

        let listed = manager.list().await.unwrap();
        let matching: Vec<_> = listed
            .iter()
            .filter(|c| c.matches_key(&cookie.key()))
            .collect();
        assert_eq!(matching, vec![&cookie], "{label}");
    }
}

#[tokio::test]
async fn test_add_replaces_same_key() {
    for (label, manager) in managers() {
        manager.add(test_cookie()).await.unwrap();
        let mut updated = test_cookie();
        updated.value = "changed".to_string();
        manager.add(updated.clone()).await.unwrap();

        let listed = manager.list().await.unwrap();
        assert_eq!(listed.len(), 1, "{label}");
        assert_eq!(listed[0].value, "changed", "{label}");
    }
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    for (label, manager) in managers() {
        let cookie = test_cookie();
        manager.add(cookie.clone()).await.unwrap();

        manager.delete(&cookie).await.unwrap();
        manager.delete(&cookie).await.unwrap();
        assert!(manager.list().await.unwrap().is_empty(), "{label}");
    }
}

#[tokio::test]
async fn test_delete_all_drains_store() {
    for (label, manager) in managers() {
        for name in ["a", "b", "c"] {
            let cookie = CanonicalCookie::builder(name, "1")
                .domain("example.com")
                .build()
                .unwrap();
            manager.add(cookie).await.unwrap();
        }
        let shown = manager.list().await.unwrap();
        assert_eq!(shown.len(), 3, "{label}");

        manager.delete_all(&shown).await;
        assert!(manager.list().await.unwrap().is_empty(), "{label}");
    }
}

#[tokio::test]
async fn test_empty_name_leaves_store_unchanged() {
    for (label, manager) in managers() {
        manager.add(test_cookie()).await.unwrap();
        let before = manager.list().await.unwrap();

        let mut nameless = test_cookie();
        nameless.name = String::new();
        let err = manager.add(nameless).await.unwrap_err();
        assert!(matches!(err, NetError::InvalidCookie { .. }), "{label}");

        assert_eq!(manager.list().await.unwrap(), before, "{label}");
    }
}

#[tokio::test]
async fn test_expired_cookie_rejected() {
    for (label, manager) in managers() {
        let mut stale = test_cookie();
        stale.expiration_time = Some(OffsetDateTime::now_utc() - Duration::minutes(1));

        let err = manager.add(stale).await.unwrap_err();
        assert!(err.is_invalid_cookie(), "{label}");
        assert!(manager.list().await.unwrap().is_empty(), "{label}");
    }
}

#[tokio::test]
async fn test_clear_removes_page_and_manual_cookies() {
    let session = CookieMonster::new();
    let (service, _task) = CookieStoreService::spawn(session.clone(), DEFAULT_QUEUE_DEPTH);
    let manager = CookieManager::new(Arc::new(service));

    let url = Url::parse("https://www.example.com/").unwrap();
    session.parse_and_save_cookie(&url, "NID=511; Path=/; HttpOnly");
    session.parse_and_save_cookie(&url, "CONSENT=PENDING; Domain=example.com; Path=/");
    manager.add(test_cookie()).await.unwrap();
    assert_eq!(manager.list().await.unwrap().len(), 3);

    manager.clear().await.unwrap();
    assert!(manager.list().await.unwrap().is_empty());
    assert_eq!(session.total_cookie_count(), 0);
}

#[tokio::test]
async fn test_concurrent_adds_all_land() {
    let manager = managers().pop().unwrap().1;

    let adds = (0..20).map(|i| {
        let manager = manager.clone();
        tokio::spawn(async move {
            let cookie = CanonicalCookie::builder(format!("c{i}"), "v")
                .domain("example.com")
                .build()
                .unwrap();
            manager.add(cookie).await
        })
    });
    for handle in futures::future::join_all(adds).await {
        handle.unwrap().unwrap();
    }

    assert_eq!(manager.list().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_store_unavailable_surfaces() {
    let (service, task) = CookieStoreService::spawn(CookieMonster::new(), DEFAULT_QUEUE_DEPTH);
    let manager = CookieManager::new(Arc::new(service.clone()));
    service.shutdown().await;
    task.await.unwrap();

    let err = manager.add(test_cookie()).await.unwrap_err();
    assert!(matches!(err, NetError::StoreUnavailable { .. }));
    let err = manager.delete(&test_cookie()).await.unwrap_err();
    assert!(matches!(err, NetError::StoreUnavailable { .. }));
}
