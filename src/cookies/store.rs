//! The asynchronous cookie store interface.
//!
//! A browser engine exposes its cookie store as three asynchronous,
//! per-operation calls: get all cookies, set one, delete one. [`CookieStore`]
//! models each as a boxed future so that completion and failure are values
//! the caller awaits rather than nested callbacks.
//!
//! # Design Notes
//!
//! - Uses `&self` so one store can serve concurrent callers.
//! - Returns boxed futures for trait object compatibility.
//! - No ordering holds between calls that were not awaited in sequence.

use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::{CanonicalCookie, CookieKey};
use crate::cookies::monster::CookieMonster;
use std::{future::Future, pin::Pin, sync::Arc};

/// Alias for the `Future` returned when listing a store.
pub type Listing = Pin<Box<dyn Future<Output = Result<Vec<CanonicalCookie>, NetError>> + Send>>;

/// Alias for the `Future` returned by a mutating store call.
pub type Applying = Pin<Box<dyn Future<Output = Result<(), NetError>> + Send>>;

/// A live cookie store of one browsing session.
///
/// Implementations own the cookies and synchronize internally.
pub trait CookieStore: Send + Sync {
    /// Resolves with every cookie currently held by the store.
    fn get_all_cookies(&self) -> Listing;

    /// Resolves once `cookie` has been applied, replacing any cookie with
    /// the same key.
    fn set_cookie(&self, cookie: CanonicalCookie) -> Applying;

    /// Resolves once no cookie matching `key` remains. Deleting an absent
    /// cookie succeeds.
    fn delete_cookie(&self, key: CookieKey) -> Applying;
}

impl CookieStore for CookieMonster {
    fn get_all_cookies(&self) -> Listing {
        let cookies = CookieMonster::get_all_cookies(self);
        Box::pin(async move { Ok(cookies) })
    }

    fn set_cookie(&self, cookie: CanonicalCookie) -> Applying {
        let monster = self.clone();
        Box::pin(async move {
            monster.set_canonical_cookie(cookie);
            Ok(())
        })
    }

    fn delete_cookie(&self, key: CookieKey) -> Applying {
        let monster = self.clone();
        Box::pin(async move {
            monster.delete_canonical_cookie(&key);
            Ok(())
        })
    }
}

impl<S: CookieStore + ?Sized> CookieStore for Arc<S> {
    fn get_all_cookies(&self) -> Listing {
        (**self).get_all_cookies()
    }

    fn set_cookie(&self, cookie: CanonicalCookie) -> Applying {
        (**self).set_cookie(cookie)
    }

    fn delete_cookie(&self, key: CookieKey) -> Applying {
        (**self).delete_cookie(key)
    }
}
