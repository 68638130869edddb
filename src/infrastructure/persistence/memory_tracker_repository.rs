//! In-process implementation of the old-URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use crate::domain::entities::{MethodKey, TrackedMethod};
use crate::domain::repositories::TrackerRepository;
use crate::error::AppError;

#[derive(Debug)]
struct MethodState {
    id: i64,
    current_url: Option<String>,
    old_urls: BTreeSet<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    methods: HashMap<MethodKey, MethodState>,
}

/// Hash-map-backed store for tests and single-process deployments.
///
/// Upholds the same invariants as the PostgreSQL implementation: methods
/// without old URLs are dropped, and old-URL existence is derived from the
/// records that reference them, so orphans cannot occur.
#[derive(Debug, Default)]
pub struct InMemoryTrackerRepository {
    inner: Mutex<Inner>,
}

impl InMemoryTrackerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl TrackerRepository for InMemoryTrackerRepository {
    async fn find_method(&self, key: &MethodKey) -> Result<Option<TrackedMethod>, AppError> {
        let inner = self.lock();
        Ok(inner
            .methods
            .get(key)
            .map(|state| {
                TrackedMethod::new(state.id, key.clone(), state.current_url.clone(), state.created_at)
            }))
    }

    async fn record_old_url(&self, key: &MethodKey, url: &str) -> Result<(), AppError> {
        let mut inner = self.lock();
        if !inner.methods.contains_key(key) {
            let id = inner.next_id + 1;
            inner.next_id = id;
            inner.methods.insert(
                key.clone(),
                MethodState {
                    id,
                    current_url: None,
                    old_urls: BTreeSet::new(),
                    created_at: Utc::now(),
                },
            );
        }
        if let Some(state) = inner.methods.get_mut(key) {
            state.old_urls.insert(url.to_string());
        }
        Ok(())
    }

    async fn set_current_url(
        &self,
        key: &MethodKey,
        current: Option<String>,
    ) -> Result<(), AppError> {
        let mut inner = self.lock();
        if let Some(state) = inner.methods.get_mut(key) {
            state.current_url = current;
        }
        Ok(())
    }

    async fn purge_old_url(&self, url: &str) -> Result<u64, AppError> {
        let mut inner = self.lock();
        let mut referencing = 0;
        for state in inner.methods.values_mut() {
            if state.old_urls.remove(url) {
                referencing += 1;
            }
        }
        inner.methods.retain(|_, state| !state.old_urls.is_empty());
        Ok(referencing)
    }

    async fn repoint_current(&self, from: &str, to: Option<String>) -> Result<u64, AppError> {
        let mut inner = self.lock();
        let mut repointed = 0;
        for state in inner.methods.values_mut() {
            if state.current_url.as_deref() == Some(from) {
                state.current_url = to.clone();
                repointed += 1;
            }
        }
        Ok(repointed)
    }

    async fn resolve_targets(&self, url: &str) -> Result<Option<Vec<String>>, AppError> {
        let inner = self.lock();
        let mut known = false;
        let mut targets = BTreeSet::new();

        for state in inner.methods.values() {
            if !state.old_urls.contains(url) {
                continue;
            }
            known = true;
            if let Some(current) = state.current_url.as_deref()
                && !current.is_empty()
            {
                targets.insert(current.to_string());
            }
        }

        if known {
            Ok(Some(targets.into_iter().collect()))
        } else {
            Ok(None)
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
