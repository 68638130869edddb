use std::sync::Arc;

use crate::application::services::RedirectResolver;
use crate::domain::repositories::TrackerRepository;

/// Shared application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TrackerRepository>,
    pub resolver: Arc<RedirectResolver>,
}

impl AppState {
    pub fn new(repository: Arc<dyn TrackerRepository>, resolver: Arc<RedirectResolver>) -> Self {
        Self {
            repository,
            resolver,
        }
    }
}
