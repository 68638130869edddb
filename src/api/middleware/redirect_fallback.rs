//! Middleware turning not-found responses into permanent redirects.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::application::services::RedirectOutcome;
use crate::state::AppState;

/// Intercepts 404 responses and consults the old-URL store.
///
/// Every other response passes through byte-for-byte. On a match the
/// original 404 is replaced with `301 Moved Permanently` or `410 Gone`;
/// on a store failure the original 404 is kept, since redirect bookkeeping
/// must never break the surrounding request handling.
pub async fn layer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let full_path = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.as_str().to_string());

    let response = next.run(request).await;

    if response.status() != StatusCode::NOT_FOUND {
        return response;
    }

    match state.resolver.resolve(&full_path).await {
        Ok(RedirectOutcome::PassThrough) => response,
        Ok(RedirectOutcome::Redirect(target)) => {
            debug!(from = %full_path, to = %target, "serving permanent redirect");
            match moved_permanently(&target) {
                Some(redirect) => redirect,
                None => {
                    warn!(target = %target, "redirect target is not a valid Location header");
                    response
                }
            }
        }
        Ok(RedirectOutcome::Gone) => {
            debug!(path = %full_path, "serving gone");
            StatusCode::GONE.into_response()
        }
        Err(e) => {
            warn!(path = %full_path, error = %e, "old-URL lookup failed, keeping 404");
            response
        }
    }
}

/// Builds a `301 Moved Permanently` response. `axum::response::Redirect`
/// would emit 308, which preserves the request method; the redirect contract
/// for relocated content is the classic 301.
fn moved_permanently(target: &str) -> Option<Response> {
    let location = HeaderValue::try_from(target).ok()?;
    let mut response = StatusCode::MOVED_PERMANENTLY.into_response();
    response.headers_mut().insert(header::LOCATION, location);
    Some(response)
}
