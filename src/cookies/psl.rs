//! Public Suffix List (PSL) checks for cookie domains.
//!
//! A cookie whose domain is a public suffix (`com`, `co.uk`, `github.io`)
//! would be shared by every site under that suffix, so such domains are
//! refused. Unknown suffixes (`localhost`, bare IP addresses, intranet names)
//! are allowed.
//!
//! Uses Mozilla's Public Suffix List via the `psl` crate.

use psl::{List, Psl};

/// Lowercase a cookie domain and drop the leading dot of a domain cookie.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Returns true if `domain` is exactly a suffix listed in the PSL.
pub fn is_public_suffix(domain: &str) -> bool {
    let domain = normalize_domain(domain);
    match List.suffix(domain.as_bytes()) {
        Some(suffix) if suffix.is_known() => suffix.as_bytes() == domain.as_bytes(),
        _ => false,
    }
}

/// Get the registrable domain (eTLD+1), e.g. `example.com` for `www.example.com`.
pub fn registrable_domain(domain: &str) -> Option<String> {
    let domain = normalize_domain(domain);
    let registrable = List.domain(domain.as_bytes())?;
    std::str::from_utf8(registrable.as_bytes())
        .ok()
        .map(str::to_string)
}

/// Check whether a page on `url_host` may set a cookie for `cookie_domain`.
///
/// The host must equal the cookie domain or be one of its subdomains, and
/// the cookie domain must not be a public suffix.
pub fn is_valid_cookie_domain(cookie_domain: &str, url_host: &str) -> bool {
    let cookie_domain = normalize_domain(cookie_domain);
    let host = normalize_domain(url_host);

    if cookie_domain.is_empty() || is_public_suffix(&cookie_domain) {
        return false;
    }

    host == cookie_domain
        || host
            .strip_suffix(cookie_domain.as_str())
            .is_some_and(|prefix| prefix.ends_with('.'))
}
