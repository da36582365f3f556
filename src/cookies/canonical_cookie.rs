use crate::base::neterror::NetError;
use crate::cookies::psl;
use serde::Serialize;
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Represents a cookie.
/// Modeled after Chromium's `net::CanonicalCookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    /// `None` marks a session cookie.
    pub expiration_time: Option<OffsetDateTime>,
    pub last_access_time: OffsetDateTime,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: Option<SameSite>,
    pub priority: CookiePriority,
    /// Informational only, as in `NSHTTPCookie.version`.
    pub version: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    NoRestriction,
    Lax,
    Strict,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::NoRestriction => "none",
            SameSite::Lax => "lax",
            SameSite::Strict => "strict",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CookiePriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Identity of a cookie inside a store: two cookies with the same key
/// replace each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CookieKey {
    pub name: String,
    pub domain: String,
    pub path: String,
}

impl fmt::Display for CookieKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}{}", self.name, self.domain, self.path)
    }
}

impl CanonicalCookie {
    /// Start building a cookie. `domain` must be set before [`CanonicalCookieBuilder::build`].
    pub fn builder(name: impl Into<String>, value: impl Into<String>) -> CanonicalCookieBuilder {
        CanonicalCookieBuilder::new(name, value)
    }

    /// The store identity of this cookie. The domain is normalized the way
    /// stores keep it, so a hand-edited `.Example.com` still finds `example.com`.
    pub fn key(&self) -> CookieKey {
        CookieKey {
            name: self.name.clone(),
            domain: psl::normalize_domain(&self.domain),
            path: self.path.clone(),
        }
    }

    pub fn matches_key(&self, key: &CookieKey) -> bool {
        self.name == key.name && self.domain == key.domain && self.path == key.path
    }

    pub fn is_session(&self) -> bool {
        self.expiration_time.is_none()
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        self.expiration_time
            .is_some_and(|expiry| expiry <= current_time)
    }

    /// Check every field a store would refuse.
    ///
    /// Runs before any store call, so a rejected cookie never reaches the store.
    pub fn validate(&self, now: OffsetDateTime) -> Result<(), NetError> {
        if self.name.is_empty() {
            return Err(NetError::invalid_cookie("cookie name is empty"));
        }
        if !self.name.chars().all(is_token_char) {
            return Err(NetError::invalid_cookie(format!(
                "cookie name {:?} contains a separator or control character",
                self.name
            )));
        }
        if self.value.chars().any(|c| c.is_control() || c == ';') {
            return Err(NetError::invalid_cookie(format!(
                "value of cookie {:?} contains ';' or a control character",
                self.name
            )));
        }
        if self.domain.is_empty() {
            return Err(NetError::invalid_cookie("cookie domain is empty"));
        }
        if self.domain != psl::normalize_domain(&self.domain)
            || self
                .domain
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | ';' | ','))
        {
            return Err(NetError::invalid_cookie(format!(
                "cookie domain {:?} is malformed",
                self.domain
            )));
        }
        if psl::is_public_suffix(&self.domain) {
            return Err(NetError::invalid_cookie(format!(
                "cookie domain {:?} is a public suffix",
                self.domain
            )));
        }
        if !self.path.starts_with('/') || self.path.chars().any(|c| c.is_control() || c == ';') {
            return Err(NetError::invalid_cookie(format!(
                "cookie path {:?} must start with '/'",
                self.path
            )));
        }
        if self.is_expired(now) {
            return Err(NetError::invalid_cookie(format!(
                "cookie {:?} has already expired",
                self.name
            )));
        }
        self.validate_prefix(self.secure)
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    /// - __Secure- cookies MUST have the Secure attribute
    /// - __Host- cookies MUST have Secure, Path="/", and no Domain attribute
    pub fn validate_prefix(&self, secure_origin: bool) -> Result<(), NetError> {
        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return Err(NetError::invalid_cookie(format!(
                "cookie {:?} needs Secure and a secure origin",
                self.name
            )));
        }

        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || !self.host_only || !secure_origin)
        {
            return Err(NetError::invalid_cookie(format!(
                "cookie {:?} needs Secure, Path=/, no Domain and a secure origin",
                self.name
            )));
        }

        Ok(())
    }

    /// Snapshot of the cookie's attributes for display.
    pub fn details(&self) -> CookieDetails {
        CookieDetails {
            name: self.name.clone(),
            value: self.value.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
            expires: self
                .expiration_time
                .and_then(|t| t.format(&Rfc3339).ok()),
            http_only: self.http_only,
            secure: self.secure,
            same_site: self.same_site.map(|s| s.as_str()),
            version: self.version,
        }
    }
}

// RFC 6265 cookie-name is an RFC 2616 token.
fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic()
        && !matches!(
            c,
            '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']' | '?'
                | '=' | '{' | '}'
        )
}

/// Builder for [`CanonicalCookie`] that validates on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct CanonicalCookieBuilder {
    name: String,
    value: String,
    domain: Option<String>,
    path: String,
    expiration_time: Option<OffsetDateTime>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
    priority: CookiePriority,
    version: u32,
}

impl CanonicalCookieBuilder {
    fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: "/".to_string(),
            expiration_time: None,
            secure: false,
            http_only: false,
            same_site: None,
            priority: CookiePriority::Medium,
            version: 0,
        }
    }

    /// A leading dot (`.example.com`) makes a domain cookie; otherwise the
    /// cookie is host-only.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn expires(mut self, at: OffsetDateTime) -> Self {
        self.expiration_time = Some(at);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn priority(mut self, priority: CookiePriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn build(self) -> Result<CanonicalCookie, NetError> {
        let raw_domain = self
            .domain
            .ok_or_else(|| NetError::invalid_cookie("cookie domain is missing"))?;
        let host_only = !raw_domain.trim().starts_with('.');
        let now = OffsetDateTime::now_utc();

        let cookie = CanonicalCookie {
            name: self.name,
            value: self.value,
            domain: psl::normalize_domain(&raw_domain),
            path: self.path,
            creation_time: now,
            expiration_time: self.expiration_time,
            last_access_time: now,
            secure: self.secure,
            http_only: self.http_only,
            host_only,
            same_site: self.same_site,
            priority: self.priority,
            version: self.version,
        };
        cookie.validate(now)?;
        Ok(cookie)
    }
}

/// Display-ready view of a cookie's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieDetails {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// RFC 3339 timestamp; `None` for session cookies.
    pub expires: Option<String>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<&'static str>,
    pub version: u32,
}

impl CookieDetails {
    /// One table row: `name=value` followed by the domain.
    pub fn summary(&self) -> String {
        format!("{}={}\t{}", self.name, self.value, self.domain)
    }
}

impl fmt::Display for CookieDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Value: {}", self.value)?;
        writeln!(f, "Domain: {}", self.domain)?;
        writeln!(f, "Path: {}", self.path)?;
        writeln!(f, "Expires: {}", self.expires.as_deref().unwrap_or("Session"))?;
        writeln!(f, "HttpOnly: {}", self.http_only)?;
        writeln!(f, "Secure: {}", self.secure)?;
        writeln!(f, "SameSite: {}", self.same_site.unwrap_or(""))?;
        write!(f, "Version: {}", self.version)
    }
}
