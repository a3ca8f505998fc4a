//! Plugins command handler
//!
//! Prints the names the registry ends up with after every registration,
//! so collisions can be checked at deployment time.

use crate::config::Settings;
use crate::plugins::{PluginRegistry, PluginRole, builtin};

pub struct PluginsCommandHandler {
    registry: PluginRegistry,
}

impl PluginsCommandHandler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            registry: builtin::registry(&settings.plugins),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (title, role) in [
            ("Sources", PluginRole::Source),
            ("Destinations", PluginRole::Destination),
        ] {
            out.push_str(&format!("{}:\n", title));
            for name in self.registry.list(role) {
                let description = self
                    .registry
                    .resolve(role, &name)
                    .map(|c| c.description().trim().to_string())
                    .unwrap_or_default();
                let summary = description.lines().next().unwrap_or_default();
                out.push_str(&format!("  {:<12} {}\n", name, summary));
            }
        }
        out
    }

    pub fn execute(&self) {
        print!("{}", self.render());
    }
}
