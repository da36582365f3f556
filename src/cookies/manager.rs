//! Cookie manager: the UI-agnostic entry point for a session's cookies.
//!
//! Modeled after Chromium's `network::CookieManager`, which fronts a
//! cookie store for callers that only need to list, set and delete.
//!
//! The manager keeps no copy of the cookies. Every [`list`](CookieManager::list)
//! asks the store again, so what a caller displays is always the last
//! snapshot the store returned. Mutations do not refresh anything; callers
//! await the mutation and then call `list` when they need the new state.
//!
//! ```rust,no_run
//! use cookiekit::cookies::canonical_cookie::CanonicalCookie;
//! use cookiekit::cookies::manager::CookieManager;
//! use time::{Duration, OffsetDateTime};
//!
//! # async fn run() -> Result<(), cookiekit::base::neterror::NetError> {
//! let manager = CookieManager::in_memory();
//! let cookie = CanonicalCookie::builder("TestCookie", "ThisisTestCookie")
//!     .domain("example.com")
//!     .expires(OffsetDateTime::now_utc() + Duration::seconds(60))
//!     .build()?;
//!
//! manager.add(cookie).await?;
//! for cookie in manager.list().await? {
//!     println!("{}", manager.inspect(&cookie));
//! }
//! manager.clear().await?;
//! # Ok(())
//! # }
//! ```

use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::{CanonicalCookie, CookieDetails};
use crate::cookies::monster::CookieMonster;
use crate::cookies::store::CookieStore;
use futures::future::join_all;
use std::sync::Arc;
use time::OffsetDateTime;

/// Façade over the cookie store of one browsing session.
#[derive(Clone)]
pub struct CookieManager {
    store: Arc<dyn CookieStore>,
}

impl CookieManager {
    pub fn new(store: Arc<dyn CookieStore>) -> Self {
        Self { store }
    }

    /// A manager over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(CookieMonster::new()))
    }

    /// Every cookie the store currently holds. An empty store yields an
    /// empty vector.
    pub async fn list(&self) -> Result<Vec<CanonicalCookie>, NetError> {
        let cookies = self.store.get_all_cookies().await?;
        tracing::debug!(count = cookies.len(), "listed cookies");
        Ok(cookies)
    }

    /// Validate `cookie` and submit it to the store.
    ///
    /// Validation failures are returned before the store is contacted.
    pub async fn add(&self, cookie: CanonicalCookie) -> Result<(), NetError> {
        if let Err(e) = cookie.validate(OffsetDateTime::now_utc()) {
            tracing::debug!(cookie = %cookie.key(), error = %e, "refused cookie");
            return Err(e);
        }
        let key = cookie.key();
        self.store.set_cookie(cookie).await?;
        tracing::debug!(cookie = %key, "added cookie");
        Ok(())
    }

    /// Delete the cookie with the same name, domain and path as `cookie`.
    /// Deleting a cookie that is already gone succeeds.
    pub async fn delete(&self, cookie: &CanonicalCookie) -> Result<(), NetError> {
        let key = cookie.key();
        self.store.delete_cookie(key.clone()).await?;
        tracing::debug!(cookie = %key, "deleted cookie");
        Ok(())
    }

    /// Delete every cookie in `cookies`, best effort.
    ///
    /// All deletions are issued together and awaited; a failed deletion is
    /// logged and skipped.
    pub async fn delete_all(&self, cookies: &[CanonicalCookie]) {
        let deletions = cookies.iter().map(|cookie| {
            let key = cookie.key();
            let pending = self.store.delete_cookie(key.clone());
            async move { (key, pending.await) }
        });

        let mut failed = 0usize;
        for (key, result) in join_all(deletions).await {
            if let Err(e) = result {
                failed += 1;
                tracing::warn!(cookie = %key, error = %e, "bulk delete skipped cookie");
            }
        }
        tracing::debug!(requested = cookies.len(), failed, "bulk delete finished");
    }

    /// Delete everything the store currently lists.
    pub async fn clear(&self) -> Result<(), NetError> {
        let cookies = self.list().await?;
        self.delete_all(&cookies).await;
        Ok(())
    }

    /// Attribute listing for one cookie.
    pub fn inspect(&self, cookie: &CanonicalCookie) -> CookieDetails {
        cookie.details()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::canonical_cookie::CookieKey;
    use crate::cookies::store::{Applying, Listing};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that records calls and fails deletions of one cookie name.
    struct FlakyStore {
        inner: CookieMonster,
        fail_name: &'static str,
        calls: AtomicUsize,
    }

    impl CookieStore for FlakyStore {
        fn get_all_cookies(&self) -> Listing {
            self.calls.fetch_add(1, Ordering::SeqCst);
            CookieStore::get_all_cookies(&self.inner)
        }

        fn set_cookie(&self, cookie: CanonicalCookie) -> Applying {
            self.calls.fetch_add(1, Ordering::SeqCst);
            CookieStore::set_cookie(&self.inner, cookie)
        }

        fn delete_cookie(&self, key: CookieKey) -> Applying {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if key.name == self.fail_name {
                return Box::pin(async { Err(NetError::store_unavailable("flaky")) });
            }
            CookieStore::delete_cookie(&self.inner, key)
        }
    }

    fn cookie(name: &str) -> CanonicalCookie {
        CanonicalCookie::builder(name, "v")
            .domain("example.com")
            .build()
            .unwrap()
    }

    fn flaky(fail_name: &'static str) -> (CookieManager, Arc<FlakyStore>) {
        let store = Arc::new(FlakyStore {
            inner: CookieMonster::new(),
            fail_name,
            calls: AtomicUsize::new(0),
        });
        (CookieManager::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_invalid_cookie_never_reaches_store() {
        let (manager, store) = flaky("none");
        let mut bad = cookie("ok");
        bad.name.clear();

        let err = manager.add(bad).await.unwrap_err();
        assert!(matches!(err, NetError::InvalidCookie { .. }));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_all_swallows_failures() {
        let (manager, store) = flaky("stuck");
        for name in ["a", "stuck", "b"] {
            manager.add(cookie(name)).await.unwrap();
        }

        let shown = manager.list().await.unwrap();
        manager.delete_all(&shown).await;

        let left = manager.list().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "stuck");
        assert_eq!(store.inner.total_cookie_count(), 1);
    }

    #[tokio::test]
    async fn test_list_propagates_store_failure() {
        let (service, task) = crate::cookies::service::CookieStoreService::spawn(
            CookieMonster::new(),
            crate::cookies::service::DEFAULT_QUEUE_DEPTH,
        );
        let manager = CookieManager::new(Arc::new(service.clone()));
        service.shutdown().await;
        task.await.unwrap();

        let err = manager.list().await.unwrap_err();
        assert!(matches!(err, NetError::StoreUnavailable { .. }));
        // Bulk delete stays best effort even with the store gone
        manager.delete_all(&[cookie("a")]).await;
    }

    #[tokio::test]
    async fn test_delete_matches_hand_edited_domain() {
        let manager = CookieManager::in_memory();
        let stored = cookie("sid");
        manager.add(stored.clone()).await.unwrap();

        let mut edited = stored;
        edited.domain = ".Example.com".to_string();
        manager.delete(&edited).await.unwrap();
        assert!(manager.list().await.unwrap().is_empty());

        manager.add(cookie("a")).await.unwrap();
        edited.name = "a".to_string();
        manager.delete_all(&[edited]).await;
        assert!(manager.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inspect_matches_details() {
        let manager = CookieManager::in_memory();
        let c = cookie("sid");
        assert_eq!(manager.inspect(&c), c.details());
    }
}
