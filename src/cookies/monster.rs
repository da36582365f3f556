use crate::cookies::canonical_cookie::{CanonicalCookie, CookieKey, CookiePriority, SameSite};
use crate::cookies::psl;
use dashmap::DashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use url::Url;

/// Limits applied by a [`CookieMonster`].
#[derive(Debug, Clone)]
pub struct CookieMonsterConfig {
    /// Maximum cookies per domain before the oldest is evicted.
    pub max_cookies_per_domain: usize,

    /// Maximum cookies across all domains.
    pub max_cookies_total: usize,
}

impl Default for CookieMonsterConfig {
    fn default() -> Self {
        Self {
            max_cookies_per_domain: 50,
            // Chromium uses 3300; a lower limit keeps memory usage predictable.
            max_cookies_total: 3000,
        }
    }
}

/// The in-memory cookie store of one browsing session.
/// Modeled after Chromium's `net::CookieMonster`.
///
/// Cloning is cheap and every clone observes the same cookies.
#[derive(Clone)]
pub struct CookieMonster {
    // Store: Map<Domain, List<Cookie>>
    store: Arc<DashMap<String, Vec<CanonicalCookie>>>,
    config: CookieMonsterConfig,
}

impl Default for CookieMonster {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieMonster {
    pub fn new() -> Self {
        Self::with_config(CookieMonsterConfig::default())
    }

    pub fn with_config(config: CookieMonsterConfig) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &CookieMonsterConfig {
        &self.config
    }

    /// Insert `cookie`, replacing any cookie with the same name, domain and path.
    pub fn set_canonical_cookie(&self, cookie: CanonicalCookie) {
        let mut entry = self.store.entry(cookie.domain.clone()).or_default();

        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);

        // Per-domain limit, oldest first
        while entry.len() >= self.config.max_cookies_per_domain {
            let Some(oldest_idx) = entry
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.creation_time)
                .map(|(i, _)| i)
            else {
                break;
            };
            let evicted = entry.remove(oldest_idx);
            tracing::debug!(cookie = %evicted.key(), "evicted cookie over per-domain limit");
        }

        entry.push(cookie);
        drop(entry); // Release lock before checking global count

        self.enforce_global_limit();
    }

    /// Remove the cookie identified by `key`. Returns whether one was removed.
    pub fn delete_canonical_cookie(&self, key: &CookieKey) -> bool {
        let removed = match self.store.get_mut(&key.domain) {
            Some(mut entry) => {
                let before = entry.len();
                entry.retain(|c| !c.matches_key(key));
                before != entry.len()
            }
            None => false,
        };
        self.store.remove_if(&key.domain, |_, cookies| cookies.is_empty());
        removed
    }

    /// Enforce the global cookie limit by evicting oldest cookies.
    fn enforce_global_limit(&self) {
        while self.total_cookie_count() > self.config.max_cookies_total {
            let mut oldest: Option<(String, usize, OffsetDateTime)> = None;

            for entry in self.store.iter() {
                for (idx, cookie) in entry.value().iter().enumerate() {
                    let older = oldest
                        .as_ref()
                        .map_or(true, |(_, _, oldest_time)| cookie.creation_time < *oldest_time);
                    if older {
                        oldest = Some((entry.key().clone(), idx, cookie.creation_time));
                    }
                }
            }

            let Some((domain, idx, _)) = oldest else {
                break;
            };
            if let Some(mut entry) = self.store.get_mut(&domain) {
                if idx < entry.len() {
                    let evicted = entry.remove(idx);
                    tracing::debug!(cookie = %evicted.key(), "evicted cookie over global limit");
                }
            }
        }
    }

    /// Drop every expired cookie.
    fn purge_expired(&self, now: OffsetDateTime) {
        for mut entry in self.store.iter_mut() {
            entry.value_mut().retain(|c| !c.is_expired(now));
        }
        self.store.retain(|_, cookies| !cookies.is_empty());
    }

    /// Snapshot of every live cookie.
    ///
    /// Sorted by domain, then longest path first, then creation time, so the
    /// order is stable between calls.
    pub fn get_all_cookies(&self) -> Vec<CanonicalCookie> {
        self.purge_expired(OffsetDateTime::now_utc());

        let mut result: Vec<CanonicalCookie> = self.iter_all_cookies().collect();
        result.sort_by(|a, b| {
            a.domain
                .cmp(&b.domain)
                .then_with(|| b.path.len().cmp(&a.path.len()))
                .then_with(|| a.creation_time.cmp(&b.creation_time))
                .then_with(|| a.name.cmp(&b.name))
        });
        result
    }

    /// Get cookies matching the URL with proper domain suffix matching.
    pub fn get_cookies_for_url(&self, url: &Url) -> Vec<CanonicalCookie> {
        let host = url.host_str().unwrap_or("").to_ascii_lowercase();
        let now = OffsetDateTime::now_utc();
        let mut result = Vec::new();

        for domain in Self::get_matching_domains(&host) {
            let Some(entry) = self.store.get(&domain) else {
                continue;
            };
            result.extend(
                entry
                    .iter()
                    .filter(|c| Self::domain_matches(&c.domain, &host, c.host_only))
                    .filter(|c| Self::path_matches(&c.path, url.path()))
                    .filter(|c| !c.secure || url.scheme() == "https")
                    .filter(|c| !c.is_expired(now))
                    .cloned(),
            );
        }

        // Longest path first, then oldest
        result.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });

        result
    }

    /// Check if cookie domain matches request host.
    /// Implements RFC 6265 domain matching.
    fn domain_matches(cookie_domain: &str, request_host: &str, host_only: bool) -> bool {
        if host_only {
            return cookie_domain.eq_ignore_ascii_case(request_host);
        }

        request_host.eq_ignore_ascii_case(cookie_domain)
            || request_host
                .strip_suffix(cookie_domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Check if request path matches cookie path.
    /// Implements RFC 6265 path matching.
    fn path_matches(cookie_path: &str, request_path: &str) -> bool {
        match request_path.strip_prefix(cookie_path) {
            Some(rest) => rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/'),
            None => false,
        }
    }

    /// The host itself and all of its parent domains.
    fn get_matching_domains(host: &str) -> Vec<String> {
        let parts: Vec<&str> = host.split('.').collect();
        (0..parts.len().saturating_sub(1).max(1))
            .map(|i| parts[i..].join("."))
            .collect()
    }

    /// RFC 6265 section 5.1.4 default-path of a request path.
    fn default_path(request_path: &str) -> String {
        if !request_path.starts_with('/') {
            return "/".to_string();
        }
        match request_path.rfind('/') {
            Some(0) | None => "/".to_string(),
            Some(idx) => request_path[..idx].to_string(),
        }
    }

    /// Save a cookie from a `Set-Cookie` header received for `url`.
    ///
    /// This is how a loaded page adds cookies to the session. Unparseable
    /// lines, cookies for foreign or public-suffix domains, and Secure
    /// cookies from insecure origins are dropped, like browsers do. The
    /// result must pass [`CanonicalCookie::validate`]. Returns whether the
    /// cookie was stored.
    pub fn parse_and_save_cookie(&self, url: &Url, cookie_line: &str) -> bool {
        let parsed = match cookie::Cookie::parse(cookie_line) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(line = %cookie_line, error = %e, "failed to parse Set-Cookie line");
                return false;
            }
        };

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => {
                tracing::warn!(url = %url, "rejected cookie from url without a host");
                return false;
            }
        };
        let now = OffsetDateTime::now_utc();

        let (domain, host_only) = match parsed.domain() {
            Some(d) => {
                if !psl::is_valid_cookie_domain(d, host) {
                    tracing::warn!(domain = %d, host = %host, "rejected cookie domain");
                    return false;
                }
                (psl::normalize_domain(d), false)
            }
            None => (psl::normalize_domain(host), true),
        };

        let path = match parsed.path() {
            Some(p) if p.starts_with('/') => p.to_string(),
            _ => Self::default_path(url.path()),
        };

        // Max-Age takes precedence over Expires
        let expiration_time = match parsed.max_age() {
            Some(max_age) => Some(now + max_age),
            None => parsed.expires_datetime(),
        };

        let same_site = parsed.same_site().map(|s| match s {
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::None => SameSite::NoRestriction,
        });

        let cookie = CanonicalCookie {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            path,
            creation_time: now,
            expiration_time,
            last_access_time: now,
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            host_only,
            same_site,
            priority: CookiePriority::Medium,
            version: 0,
        };

        // An already-expired Set-Cookie deletes the existing cookie
        if cookie.is_expired(now) {
            self.delete_canonical_cookie(&cookie.key());
            return false;
        }

        let secure_origin = url.scheme() == "https";
        if cookie.secure && !secure_origin {
            tracing::warn!(cookie = %cookie.key(), scheme = %url.scheme(), "rejected Secure cookie from insecure origin");
            return false;
        }

        if let Err(e) = cookie.validate_prefix(secure_origin) {
            tracing::warn!(cookie = %cookie.key(), error = %e, "rejected cookie prefix");
            return false;
        }

        if let Err(e) = cookie.validate(now) {
            tracing::warn!(cookie = %cookie.key(), error = %e, "rejected invalid cookie");
            return false;
        }

        self.set_canonical_cookie(cookie);
        true
    }

    /// Get total cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    /// Clear all cookies.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Iterate over all cookies, expired ones included.
    pub fn iter_all_cookies(&self) -> impl Iterator<Item = CanonicalCookie> + '_ {
        self.store.iter().flat_map(|entry| entry.value().clone())
    }
}
