//! Repository trait for the old-URL store.

use crate::domain::entities::{MethodKey, TrackedMethod};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for tracked-method records and the old-URL set.
///
/// Implementations maintain two invariants on every mutating call:
///
/// - a tracked-method record whose old-URL set becomes empty is removed;
/// - an old URL referenced by no record is removed.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTrackerRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryTrackerRepository`] - in-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackerRepository: Send + Sync {
    /// Finds the tracked-method record for a key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_method(&self, key: &MethodKey) -> Result<Option<TrackedMethod>, AppError>;

    /// Records `url` as an old URL of the keyed accessor, creating the
    /// method record and the old-URL entry as needed. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_old_url(&self, key: &MethodKey, url: &str) -> Result<(), AppError>;

    /// Overwrites the current URL of the keyed record. `None` marks the
    /// record's old URLs as gone (410). A no-op when the record does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn set_current_url(
        &self,
        key: &MethodKey,
        current: Option<String>,
    ) -> Result<(), AppError>;

    /// Removes `url` from the old-URL set everywhere. Used when a URL
    /// becomes current again: it must not simultaneously be a stale old URL
    /// pointing elsewhere, or redirects could loop.
    ///
    /// Returns the number of records that referenced the URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn purge_old_url(&self, url: &str) -> Result<u64, AppError>;

    /// Repoints every record whose `current_url` equals `from` to `to`.
    /// `to = None` turns those records into gone markers. This is the chain
    /// collapse step: a request for an even-older URL resolves in one hop.
    ///
    /// Returns the number of repointed records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn repoint_current(&self, from: &str, to: Option<String>) -> Result<u64, AppError>;

    /// Looks up `url` as an old URL, exact match.
    ///
    /// # Returns
    ///
    /// - `Ok(None)` - the URL was never recorded as old
    /// - `Ok(Some(targets))` - sorted, de-duplicated non-empty current URLs
    ///   of all associated records; empty means every source is gone
    ///
    /// Sits on the not-found request path, so implementations must serve it
    /// from a unique index on the URL column.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn resolve_targets(&self, url: &str) -> Result<Option<Vec<String>>, AppError>;

    /// Connectivity probe for health reporting.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
