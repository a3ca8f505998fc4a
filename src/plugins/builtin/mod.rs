//! Plugins compiled into the router.

mod echo;
mod form;
mod json;
mod sample;
mod webhook;

pub use echo::{EchoDestination, EchoFactory};
pub use form::{FormFactory, FormSource};
pub use json::{JsonFactory, JsonSource};
pub use sample::{SampleFactory, SampleSource};
pub use webhook::{WebhookDestination, WebhookFactory};

use crate::config::PluginsConfig;

use super::PluginRegistry;

/// Builds the registry of every built-in plugin.
///
/// Destinations capture their settings here; the registry never changes
/// afterwards.
pub fn registry(settings: &PluginsConfig) -> PluginRegistry {
    let mut builder = PluginRegistry::builder();
    builder
        .source("sample", SampleFactory)
        .source("json", JsonFactory)
        .source("form", FormFactory)
        .destination("echo", EchoFactory)
        .destination("webhook", WebhookFactory::new(settings.webhook.clone()));
    builder.build()
}
