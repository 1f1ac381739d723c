//! Application state for dependency injection.

use std::sync::Arc;

use user_service_lib::UserRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn UserRepository>,
}

impl AppState {
    /// Create new app state around the repository chosen at startup.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}
