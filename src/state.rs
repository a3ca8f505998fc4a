//! Application state for Axum web framework.

use std::sync::Arc;

use crate::plugins::PluginRegistry;
use crate::services::Services;

/// Shared state handed to every handler.
///
/// Cloning is cheap: the registry is frozen behind an `Arc` and the services
/// only hold clones of that `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub registry: Arc<PluginRegistry>,
}

impl AppState {
    pub fn new(registry: PluginRegistry) -> Self {
        let registry = Arc::new(registry);
        Self {
            services: Services::new(registry.clone()),
            registry,
        }
    }
}
