//! Cookie storage and management.
//!
//! # Architecture
//!
//! This implementation mirrors Chromium's cookie architecture:
//!
//! | Chromium (C++) | cookiekit (Rust) | Responsibility |
//! |----------------|------------------|----------------|
//! | `network::CookieManager` | [`CookieManager`](manager::CookieManager) | List, add, delete for UI and tools |
//! | `net::CookieStore` | [`CookieStore`](store::CookieStore) | Asynchronous store interface |
//! | `net::CookieMonster` | [`CookieMonster`](monster::CookieMonster) | In-memory jar with eviction |
//! | `net::CanonicalCookie` | [`CanonicalCookie`](canonical_cookie::CanonicalCookie) | Single validated cookie |
//!
//! [`CookieStoreService`](service::CookieStoreService) runs a `CookieMonster`
//! on its own task so callers reach it the way they reach a browser engine's
//! store: by request and completion.
//!
//! # Example
//!
//! ```rust,no_run
//! use cookiekit::cookies::manager::CookieManager;
//! use cookiekit::cookies::monster::CookieMonster;
//! use cookiekit::cookies::service::{CookieStoreService, DEFAULT_QUEUE_DEPTH};
//! use std::sync::Arc;
//! use url::Url;
//!
//! # async fn run() -> Result<(), cookiekit::base::neterror::NetError> {
//! let session = CookieMonster::new();
//! let url = Url::parse("https://example.com/").unwrap();
//! session.parse_and_save_cookie(&url, "session_id=abc123; Path=/; Secure; HttpOnly");
//!
//! let (service, _task) = CookieStoreService::spawn(session.clone(), DEFAULT_QUEUE_DEPTH);
//! let manager = CookieManager::new(Arc::new(service));
//! for cookie in manager.list().await? {
//!     println!("{}", cookie.details().summary());
//! }
//! # Ok(())
//! # }
//! ```

pub mod canonical_cookie;
pub mod manager;
pub mod monster;
pub mod psl;
pub mod service;
pub mod store;
