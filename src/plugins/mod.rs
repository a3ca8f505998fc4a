//! Plugin contract and registry.
//!
//! Sources interpret inbound payloads and render them; destinations deliver
//! rendered content. Both are registered by name in a [`PluginRegistry`]
//! that is built once at start-up and never changes afterwards.

pub mod builtin;
mod destination;
mod document;
mod error;
mod payload;
mod registry;
mod request;
mod source;
mod table;

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

pub use destination::{DeliveredResponse, Delivery, Destination, DestinationFactory};
pub use document::{PluginDocument, PluginSummary};
pub use error::{PluginError, PluginResult};
pub use payload::{FormData, Payload, PayloadEncoding};
pub use registry::{PluginConstructor, PluginRegistry, RegistryBuilder};
pub use request::{Credentials, RawRequest};
pub use source::{Source, SourceFactory, SourceInput};
pub use table::{Table, TableFormat, UnknownTableFormat};

/// The two independent plugin namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PluginRole {
    Source,
    Destination,
}

impl PluginRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginRole::Source => "source",
            PluginRole::Destination => "destination",
        }
    }
}

impl fmt::Display for PluginRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
