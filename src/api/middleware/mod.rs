//! HTTP middleware.

pub mod redirect_fallback;
pub mod tracing;
