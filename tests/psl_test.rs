//! Public Suffix List (PSL) integration tests.

use cookiekit::base::neterror::NetError;
use cookiekit::cookies::canonical_cookie::CanonicalCookie;
use cookiekit::cookies::monster::CookieMonster;
use cookiekit::cookies::psl::{is_public_suffix, is_valid_cookie_domain, registrable_domain};
use url::Url;

#[test]
fn test_tld_is_public_suffix() {
    assert!(is_public_suffix("com"));
    assert!(is_public_suffix("org"));
    assert!(is_public_suffix("co.uk"));
    assert!(is_public_suffix("com.au"));
}

#[test]
fn test_site_is_not_public_suffix() {
    assert!(!is_public_suffix("google.com"));
    assert!(!is_public_suffix("bbc.co.uk"));
    assert!(!is_public_suffix("user.github.io"));
}

#[test]
fn test_registrable_domain_extraction() {
    assert_eq!(
        registrable_domain("www.bbc.co.uk"),
        Some("bbc.co.uk".to_string())
    );
    assert_eq!(
        registrable_domain(".WWW.Example.com"),
        Some("example.com".to_string())
    );
}

#[test]
fn test_subdomain_may_set_parent_cookie() {
    assert!(is_valid_cookie_domain("example.com", "login.example.com"));
    assert!(!is_valid_cookie_domain("login.example.com", "example.com"));
    assert!(!is_valid_cookie_domain("user.github.io", "other.github.io"));
}

#[test]
fn test_manual_cookie_on_public_suffix_rejected() {
    let err = CanonicalCookie::builder("tracker", "1")
        .domain(".com")
        .build()
        .unwrap_err();
    assert!(matches!(err, NetError::InvalidCookie { .. }));
}

#[test]
fn test_localhost_cookies_allowed() {
    let cookie = CanonicalCookie::builder("dev", "1")
        .domain("localhost")
        .build()
        .unwrap();
    assert_eq!(cookie.domain, "localhost");

    let jar = CookieMonster::new();
    let url = Url::parse("http://localhost:3000/").unwrap();
    assert!(jar.parse_and_save_cookie(&url, "dev=1; Path=/"));
    assert_eq!(jar.get_cookies_for_url(&url).len(), 1);
}
