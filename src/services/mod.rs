//! Service layer.
//!
//! Services hold the shared plugin registry and implement the operations
//! the HTTP handlers and CLI commands expose.

mod documentation;
mod routing;

pub use documentation::DocumentationService;
pub use routing::RoutingService;

use std::sync::Arc;

use crate::plugins::PluginRegistry;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since every service only holds an `Arc` to the registry.
#[derive(Clone)]
pub struct Services {
    pub routing: RoutingService,
    pub documentation: DocumentationService,
}

impl Services {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            routing: RoutingService::new(registry.clone()),
            documentation: DocumentationService::new(registry),
        }
    }
}
