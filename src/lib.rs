//! # cookiekit
//!
//! A Chromium-inspired cookie store and the manager that fronts it.
//!
//! `cookiekit` gives any presentation layer (a GUI table, a CLI, a test
//! harness) one small contract over a browsing session's cookies: list
//! them, add one, inspect one, delete one, or delete everything shown.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cookiekit::cookies::canonical_cookie::CanonicalCookie;
//! use cookiekit::cookies::manager::CookieManager;
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = CookieManager::in_memory();
//!     let cookie = CanonicalCookie::builder("TestCookie", "ThisisTestCookie")
//!         .domain("example.com")
//!         .build()
//!         .unwrap();
//!     manager.add(cookie).await.unwrap();
//!     println!("{} cookies", manager.list().await.unwrap().len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`cookies`] - Cookie records, stores, and the cookie manager

pub mod base;
pub mod cookies;
