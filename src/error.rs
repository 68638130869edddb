//! Error types for the tracking pipeline and the HTTP surface.
//!
//! Three distinct failure classes exist:
//!
//! - [`ConfigError`] - raised at registration/startup time and fatal there.
//! - [`UnresolvableUrl`] - a tracked accessor cannot currently produce a URL;
//!   always recovered locally as "no URL".
//! - [`AppError`] - repository and HTTP-level errors. Inside the change-tracker
//!   hooks these are logged and swallowed so that a save or delete never fails
//!   because of redirect bookkeeping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Configuration problems detected while registering a tracked type or
/// wiring up the service. These abort registration/startup and are never
/// raised on the per-save path.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A type was registered without any URL tracking methods.
    #[error("no URL tracking methods declared for '{content_type}'")]
    NoTrackingMethods { content_type: &'static str },

    /// A tracking method name appears more than once for the same type.
    #[error("duplicate URL tracking method '{method}' on '{content_type}'")]
    DuplicateMethod {
        content_type: &'static str,
        method: &'static str,
    },

    /// A tracking method was declared with an empty name.
    #[error("empty URL tracking method name on '{content_type}'")]
    EmptyMethodName { content_type: &'static str },

    /// The redirect fallback was enabled without the tracker store component.
    #[error("the 'redirects' component requires the 'tracker' store component")]
    MissingStoreComponent,
}

/// Signals that a tracked URL accessor cannot produce a URL right now,
/// e.g. because routing parameters are missing. Treated as "no URL",
/// never propagated out of the tracking hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("URL could not be resolved")]
pub struct UnresolvableUrl;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation { message, .. } => write!(f, "validation error: {message}"),
            AppError::NotFound { message, .. } => write!(f, "not found: {message}"),
            AppError::Conflict { message, .. } => write!(f, "conflict: {message}"),
            AppError::Internal { message, .. } => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }
    }

    AppError::internal("Database error", json!({}))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}
