//! Explicit not-found fallback.

use axum::http::StatusCode;

/// Router fallback for unmatched paths.
///
/// Emits a plain 404 so the redirect-fallback middleware wrapping the router
/// gets a well-defined signal to consult the old-URL store.
pub async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}
