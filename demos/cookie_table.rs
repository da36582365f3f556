//! Cookie table example.
//!
//! Plays the part of a small browser window: a page load sets cookies,
//! then the table is refreshed after each action (add a test cookie,
//! inspect it, delete one row, clear everything).
//!
//! Run with `RUST_LOG=cookiekit=debug` to see each store call.

use cookiekit::cookies::canonical_cookie::CanonicalCookie;
use cookiekit::cookies::manager::CookieManager;
use cookiekit::cookies::monster::CookieMonster;
use cookiekit::cookies::service::{CookieStoreService, DEFAULT_QUEUE_DEPTH};
use std::error::Error;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

async fn print_table(manager: &CookieManager) -> Result<Vec<CanonicalCookie>, Box<dyn Error>> {
    let cookies = manager.list().await?;
    println!("{} cookie(s)", cookies.len());
    for (row, cookie) in cookies.iter().enumerate() {
        println!("  [{}] {}", row, cookie.details().summary());
    }
    Ok(cookies)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();

    let session = CookieMonster::new();
    let (service, task) = CookieStoreService::spawn(session.clone(), DEFAULT_QUEUE_DEPTH);
    let manager = CookieManager::new(Arc::new(service.clone()));

    println!("--- Load home page ---");
    let home = Url::parse("https://www.google.com/")?;
    session.parse_and_save_cookie(&home, "NID=511=abc; Path=/; Domain=.google.com; HttpOnly; Secure; Max-Age=15724800");
    session.parse_and_save_cookie(&home, "AEC=Ae3NU9; Path=/; Secure; SameSite=Lax; Max-Age=15552000");
    print_table(&manager).await?;

    println!("\n--- Set test cookie ---");
    let test_cookie = CanonicalCookie::builder("TestCookie", "ThisisTestCookie")
        .domain(home.host_str().unwrap_or("."))
        .path("/")
        .expires(OffsetDateTime::now_utc() + Duration::seconds(60))
        .build()?;
    manager.add(test_cookie).await?;
    let cookies = print_table(&manager).await?;

    println!("\n--- Inspect row 0 ---");
    if let Some(cookie) = cookies.first() {
        println!("{}", manager.inspect(cookie));
        println!("{}", serde_json::to_string_pretty(&manager.inspect(cookie))?);
    }

    println!("\n--- Set invalid cookie ---");
    let rejected = CanonicalCookie::builder("", "nameless").domain("www.google.com").build();
    if let Err(e) = rejected {
        println!("rejected: {}", e);
    }

    println!("\n--- Delete row 0 ---");
    if let Some(cookie) = cookies.first() {
        manager.delete(cookie).await?;
    }
    let cookies = print_table(&manager).await?;

    println!("\n--- Clear ---");
    manager.delete_all(&cookies).await;
    print_table(&manager).await?;

    service.shutdown().await;
    task.await?;
    Ok(())
}
