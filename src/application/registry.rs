//! Registration of content types into the tracking hooks.
//!
//! Registration is configuration-time work: it validates a type's URL
//! accessor list once and hands back a typed hook handle. Nothing here runs
//! on the per-request or per-save hot path.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::application::services::{PriorUrls, UrlChangeTracker};
use crate::domain::tracked::UrlTracked;
use crate::error::ConfigError;

/// Validates tracked types and wires them to the change tracker.
///
/// Registering the same content type twice is deduped: the second call
/// returns a fresh handle to the same tracker instead of double-subscribing.
pub struct TrackerRegistry {
    tracker: Arc<UrlChangeTracker>,
    registered: Mutex<HashSet<&'static str>>,
}

impl TrackerRegistry {
    pub fn new(tracker: Arc<UrlChangeTracker>) -> Self {
        Self {
            tracker,
            registered: Mutex::new(HashSet::new()),
        }
    }

    /// Registers `T` for URL tracking and returns its hook handle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `T` declares no URL accessors, an
    /// accessor with an empty name, or two accessors with the same name.
    /// These are setup mistakes and must abort configuration; they can
    /// never surface during save processing.
    pub fn register<T: UrlTracked>(&self) -> Result<TrackedHooks<T>, ConfigError> {
        let content_type = T::content_type();
        let methods = T::url_methods();

        if methods.is_empty() {
            return Err(ConfigError::NoTrackingMethods { content_type });
        }

        let mut seen = HashSet::new();
        for method in &methods {
            if method.name.is_empty() {
                return Err(ConfigError::EmptyMethodName { content_type });
            }
            if !seen.insert(method.name) {
                return Err(ConfigError::DuplicateMethod {
                    content_type,
                    method: method.name,
                });
            }
        }

        let mut registered = self
            .registered
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if registered.insert(content_type) {
            info!(content_type, methods = methods.len(), "URL tracking registered");
        } else {
            debug!(content_type, "already registered, reusing tracking hooks");
        }

        Ok(TrackedHooks {
            tracker: Arc::clone(&self.tracker),
            _marker: PhantomData,
        })
    }

    /// Whether a content type has been registered.
    pub fn is_registered(&self, content_type: &str) -> bool {
        self.registered
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(content_type)
    }
}

/// Typed hook handle for one registered content type.
///
/// The host's persistence layer invokes these callbacks synchronously around
/// its own writes, in the order shown:
///
/// 1. [`before_save`] with the pending object and its persisted counterpart
/// 2. the host performs the write
/// 3. [`after_save`] with the saved object and the captured snapshot
///
/// and [`after_delete`] after removing an object.
///
/// [`before_save`]: TrackedHooks::before_save
/// [`after_save`]: TrackedHooks::after_save
/// [`after_delete`]: TrackedHooks::after_delete
pub struct TrackedHooks<T: UrlTracked> {
    tracker: Arc<UrlChangeTracker>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: UrlTracked> TrackedHooks<T> {
    /// Pre-write hook; see [`UrlChangeTracker::capture_prior_urls`].
    pub fn before_save(&self, pending: &T, persisted: Option<&T>) -> PriorUrls {
        self.tracker.capture_prior_urls(pending, persisted)
    }

    /// Post-write hook; see [`UrlChangeTracker::track_changed_urls`].
    pub async fn after_save(&self, saved: &T, prior: PriorUrls) {
        self.tracker.track_changed_urls(saved, prior).await;
    }

    /// Post-delete hook; see [`UrlChangeTracker::track_deleted_urls`].
    pub async fn after_delete(&self, deleted: &T) {
        self.tracker.track_deleted_urls(deleted).await;
    }
}

impl<T: UrlTracked> Clone for TrackedHooks<T> {
    fn clone(&self) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
            _marker: PhantomData,
        }
    }
}
