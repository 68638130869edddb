//! URL change detection across saves and deletes of tracked objects.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{MethodKey, TrackedMethod};
use crate::domain::repositories::TrackerRepository;
use crate::domain::tracked::{UrlMethod, UrlTracked};
use crate::error::AppError;

/// Transient snapshot of an object's URLs taken before a pending write,
/// one entry per tracked accessor in declaration order. `None` means the
/// accessor could not resolve a URL at that point.
///
/// Produced by [`UrlChangeTracker::capture_prior_urls`] and consumed by
/// [`UrlChangeTracker::track_changed_urls`]; never persisted itself.
#[derive(Debug, Clone, Default)]
pub struct PriorUrls(Vec<(&'static str, Option<String>)>);

impl PriorUrls {
    /// True for a brand-new object: no persisted counterpart existed, so
    /// there is nothing to diff against.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prior URL captured for the named accessor, if any was resolvable.
    pub fn get(&self, method_name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == method_name)
            .and_then(|(_, url)| url.as_deref())
    }

    fn push(&mut self, name: &'static str, url: Option<String>) {
        self.0.push((name, url));
    }
}

/// Change-tracker hooks invoked around saves and deletes of tracked objects.
///
/// The host's persistence layer calls [`capture_prior_urls`] before writing
/// an object, carries the returned [`PriorUrls`] through the write, and calls
/// [`track_changed_urls`] afterwards (or [`track_deleted_urls`] after a
/// delete). All hooks run synchronously within the triggering operation.
///
/// Store failures inside the after-hooks are logged and swallowed: a save or
/// delete must never fail because of redirect bookkeeping.
///
/// [`capture_prior_urls`]: UrlChangeTracker::capture_prior_urls
/// [`track_changed_urls`]: UrlChangeTracker::track_changed_urls
/// [`track_deleted_urls`]: UrlChangeTracker::track_deleted_urls
pub struct UrlChangeTracker {
    repository: Arc<dyn TrackerRepository>,
}

impl UrlChangeTracker {
    pub fn new(repository: Arc<dyn TrackerRepository>) -> Self {
        Self { repository }
    }

    /// Before-save hook. Resolves every tracked accessor against the
    /// *persisted* counterpart of the object, i.e. its state before the
    /// pending write.
    ///
    /// A new object (no persisted counterpart) yields an empty snapshot and
    /// causes no store access at any point. An unresolvable URL is captured
    /// as `None`, not treated as an error.
    pub fn capture_prior_urls<T: UrlTracked>(
        &self,
        pending: &T,
        persisted: Option<&T>,
    ) -> PriorUrls {
        let mut prior = PriorUrls::default();

        let Some(db_object) = persisted else {
            debug!(
                content_type = T::content_type(),
                object_id = %pending.object_id(),
                "new object, no URL tracking required"
            );
            return prior;
        };

        for method in T::url_methods() {
            let url = resolve_url(&method, db_object);
            prior.push(method.name, url);
        }

        prior
    }

    /// After-save hook. Diffs the saved object's URLs against the captured
    /// snapshot and updates the store. Errors are logged, never returned.
    pub async fn track_changed_urls<T: UrlTracked>(&self, saved: &T, prior: PriorUrls) {
        if let Err(e) = self.apply_changed_urls(saved, prior).await {
            warn!(
                content_type = T::content_type(),
                object_id = %saved.object_id(),
                error = %e,
                "URL change tracking failed; save is unaffected"
            );
        }
    }

    /// After-delete hook. Marks every resolvable URL of the deleted object
    /// as permanently gone, along with all old URLs that pointed at it.
    /// Errors are logged, never returned.
    pub async fn track_deleted_urls<T: UrlTracked>(&self, deleted: &T) {
        if let Err(e) = self.apply_deleted_urls(deleted).await {
            warn!(
                content_type = T::content_type(),
                object_id = %deleted.object_id(),
                error = %e,
                "URL deletion tracking failed; delete is unaffected"
            );
        }
    }

    /// Looks up the stored record for one accessor of an object. Read-only;
    /// useful for hosts that surface redirect bookkeeping in their own admin
    /// tooling.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn tracked_state<T: UrlTracked>(
        &self,
        object: &T,
        method_name: &str,
    ) -> Result<Option<TrackedMethod>, AppError> {
        let key = MethodKey::of(object, method_name);
        self.repository.find_method(&key).await
    }

    async fn apply_changed_urls<T: UrlTracked>(
        &self,
        saved: &T,
        prior: PriorUrls,
    ) -> Result<(), AppError> {
        if prior.is_empty() {
            return Ok(());
        }

        let methods = T::url_methods();

        for (method_name, prior_url) in prior.0 {
            let Some(method) = methods.iter().find(|m| m.name == method_name) else {
                continue;
            };
            let new_url = resolve_url(method, saved);
            let key = MethodKey::of(saved, method_name);

            match (prior_url, new_url) {
                // URL vanished: the prior URL becomes a gone record.
                (Some(prior_url), None) => {
                    debug!(key = %key, old_url = %prior_url, "tracking URL deletion");
                    self.repository.record_old_url(&key, &prior_url).await?;
                    self.repository.set_current_url(&key, None).await?;
                }
                // No prior URL to redirect from, or nothing changed.
                (None, _) => {}
                (Some(prior_url), Some(new_url)) if prior_url == new_url => {}
                (Some(prior_url), Some(new_url)) => {
                    debug!(key = %key, old_url = %prior_url, new_url = %new_url, "tracking URL change");

                    // The new URL must not linger as a stale old URL pointing
                    // elsewhere; that would make the fresh redirect loop.
                    self.repository.purge_old_url(&new_url).await?;

                    // Collapse chains: anything that redirected to the prior
                    // URL now redirects straight to the new one.
                    let repointed = self
                        .repository
                        .repoint_current(&prior_url, Some(new_url.clone()))
                        .await?;
                    if repointed > 0 {
                        debug!(key = %key, repointed, "collapsed redirect chains");
                    }

                    self.repository.record_old_url(&key, &prior_url).await?;
                    self.repository.set_current_url(&key, Some(new_url)).await?;
                }
            }
        }

        Ok(())
    }

    async fn apply_deleted_urls<T: UrlTracked>(&self, deleted: &T) -> Result<(), AppError> {
        for method in T::url_methods() {
            let Some(url) = resolve_url(&method, deleted) else {
                continue;
            };
            let key = MethodKey::of(deleted, method.name);
            debug!(key = %key, url = %url, "tracking deleted object URL");

            // Nothing may keep redirecting to a URL that no longer exists.
            self.repository.repoint_current(&url, None).await?;

            self.repository.record_old_url(&key, &url).await?;
            self.repository.set_current_url(&key, None).await?;
        }

        Ok(())
    }
}

/// Resolves one accessor, folding unresolvable and empty results into `None`.
fn resolve_url<T: UrlTracked>(method: &UrlMethod<T>, object: &T) -> Option<String> {
    (method.resolve)(object).ok().filter(|url| !url.is_empty())
}
