//! Self-description of registered plugins.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::plugins::{PluginDocument, PluginRegistry, PluginRole};

#[derive(Clone)]
pub struct DocumentationService {
    registry: Arc<PluginRegistry>,
}

impl DocumentationService {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// Documents every plugin registered under `name`, source first.
    ///
    /// Plugins without their own document get a summary built from their
    /// static description.
    pub fn describe(&self, name: &str) -> AppResult<Vec<PluginDocument>> {
        let documents: Vec<PluginDocument> = [PluginRole::Source, PluginRole::Destination]
            .into_iter()
            .filter_map(|role| {
                let constructor = self.registry.resolve(role, name)?;
                let document = match constructor.render_documentation() {
                    Some(custom) => PluginDocument::Custom(custom),
                    None => PluginDocument::summary(name, role, constructor.description()),
                };
                Some(document)
            })
            .collect();

        if documents.is_empty() {
            return Err(AppError::PluginNotFound {
                name: name.to_string(),
            });
        }
        Ok(documents)
    }

    /// Registered names for both roles.
    pub fn list(&self) -> (Vec<String>, Vec<String>) {
        (
            self.registry.list(PluginRole::Source),
            self.registry.list(PluginRole::Destination),
        )
    }
}
