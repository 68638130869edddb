//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health` - health check: old-URL store reachability (public)
//! - anything else - explicit 404, then the redirect fallback consults the
//!   old-URL store and answers 301/410 where a historical URL matches
//!
//! # Middleware
//!
//! - **Tracing** - structured request/response logging
//! - **Redirect fallback** - old-URL resolution on not-found responses only

use axum::routing::get;
use axum::{Router, middleware};

use crate::api::handlers::{health_handler, not_found_handler};
use crate::api::middleware::{redirect_fallback, tracing};
use crate::state::AppState;

/// Constructs the application router.
///
/// # Arguments
///
/// - `state` - shared application state injected into handlers and middleware
/// - `redirects_enabled` - when `false`, the redirect fallback layer is left
///   out and unmatched paths answer plain 404s
pub fn app_router(state: AppState, redirects_enabled: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .fallback(not_found_handler);

    if redirects_enabled {
        router = router.layer(middleware::from_fn_with_state(
            state.clone(),
            redirect_fallback::layer,
        ));
    }

    router.layer(tracing::layer()).with_state(state)
}
