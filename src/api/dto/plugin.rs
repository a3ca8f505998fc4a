//! Plugin listing DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// Names registered for each role, sorted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PluginListResponse {
    #[schema(example = json!(["form", "json", "sample"]))]
    pub sources: Vec<String>,
    #[schema(example = json!(["echo", "webhook"]))]
    pub destinations: Vec<String>,
}

impl From<(Vec<String>, Vec<String>)> for PluginListResponse {
    fn from((sources, destinations): (Vec<String>, Vec<String>)) -> Self {
        Self {
            sources,
            destinations,
        }
    }
}
