//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::TagStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration and the object tag store. Nothing in
/// here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tags: Arc<dyn TagStore>,
}

impl AppState {
    /// Creates a new application state from the given configuration and tag store.
    pub fn new(config: AppConfig, tags: Arc<dyn TagStore>) -> Self {
        Self {
            config: Arc::new(config),
            tags,
        }
    }
}
