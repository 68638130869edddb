#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use url_tracker::application::registry::{TrackedHooks, TrackerRegistry};
use url_tracker::application::services::{RedirectResolver, UrlChangeTracker};
use url_tracker::domain::repositories::TrackerRepository;
use url_tracker::domain::tracked::{UrlMethod, UrlTracked};
use url_tracker::error::UnresolvableUrl;
use url_tracker::infrastructure::persistence::InMemoryTrackerRepository;
use url_tracker::state::AppState;

/// Minimal content object standing in for a host application model.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: i64,
    pub url: Option<String>,
}

impl Page {
    pub fn at(id: i64, url: &str) -> Self {
        Self {
            id,
            url: Some(url.to_string()),
        }
    }

    pub fn unrouted(id: i64) -> Self {
        Self { id, url: None }
    }
}

impl UrlTracked for Page {
    fn content_type() -> &'static str {
        "page"
    }

    fn object_id(&self) -> String {
        self.id.to_string()
    }

    fn url_methods() -> Vec<UrlMethod<Self>> {
        vec![UrlMethod {
            name: "absolute_url",
            resolve: |p| p.url.clone().ok_or(UnresolvableUrl),
        }]
    }
}

/// Stand-in for the host's persistence layer: keeps objects in a map and
/// invokes the tracking hooks around every write and delete, the way a real
/// storage layer would.
pub struct TestHost {
    hooks: TrackedHooks<Page>,
    records: HashMap<i64, Page>,
}

impl TestHost {
    pub fn new(repository: Arc<InMemoryTrackerRepository>) -> Self {
        let store: Arc<dyn TrackerRepository> = repository;
        let tracker = Arc::new(UrlChangeTracker::new(store));
        let registry = TrackerRegistry::new(tracker);
        let hooks = registry.register::<Page>().expect("valid tracked type");

        Self {
            hooks,
            records: HashMap::new(),
        }
    }

    pub async fn save(&mut self, page: Page) {
        let persisted = self.records.get(&page.id).cloned();
        let prior = self.hooks.before_save(&page, persisted.as_ref());
        self.records.insert(page.id, page.clone());
        self.hooks.after_save(&page, prior).await;
    }

    pub async fn delete(&mut self, id: i64) {
        if let Some(page) = self.records.remove(&id) {
            self.hooks.after_delete(&page).await;
        }
    }
}

/// Builds application state over a shared in-memory store.
pub fn test_state(
    repository: Arc<InMemoryTrackerRepository>,
    append_slash: bool,
) -> AppState {
    let store: Arc<dyn TrackerRepository> = repository;
    let resolver = Arc::new(RedirectResolver::new(Arc::clone(&store), append_slash));
    AppState::new(store, resolver)
}
