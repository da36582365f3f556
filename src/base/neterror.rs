use thiserror::Error;

/// Errors surfaced by cookie stores and the [`CookieManager`](crate::cookies::manager::CookieManager).
///
/// Codes live in a custom range below Chromium's `net_error_list.h`, so they
/// never collide with real network error codes.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    #[error("Invalid cookie: {reason}")]
    InvalidCookie { reason: String },
    #[error("Cookie store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn invalid_cookie(reason: impl Into<String>) -> Self {
        NetError::InvalidCookie {
            reason: reason.into(),
        }
    }

    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        NetError::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// True for every rejection of a malformed cookie record.
    pub fn is_invalid_cookie(&self) -> bool {
        matches!(self, NetError::InvalidCookie { .. })
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::InvalidCookie { .. } => -10100,
            NetError::StoreUnavailable { .. } => -10101,
            NetError::Unknown(code) => *code,
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -10100 => NetError::InvalidCookie {
                reason: String::new(),
            },
            -10101 => NetError::StoreUnavailable {
                reason: String::new(),
            },
            _ => NetError::Unknown(code),
        }
    }
}
