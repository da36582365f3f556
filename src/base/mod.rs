//! Base types and error handling.
//!
//! Provides foundational types shared by every cookie component:
//! - [`NetError`](neterror::NetError): error codes for cookie validation and store failures

pub mod neterror;
