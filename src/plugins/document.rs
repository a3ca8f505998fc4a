use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::PluginRole;

/// Generated self-description for plugins without a rich document
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PluginSummary {
    /// Registered plugin name
    #[schema(example = "echo")]
    pub name: String,
    /// Role the name is registered under
    #[serde(rename = "type")]
    pub role: PluginRole,
    /// Static plugin description, trimmed
    pub description: String,
}

/// What the documentation reflector returns for one registered role
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PluginDocument {
    /// Document rendered by the plugin itself
    Custom(Value),
    Summary(PluginSummary),
}

impl PluginDocument {
    pub fn summary(name: impl Into<String>, role: PluginRole, description: &str) -> Self {
        PluginDocument::Summary(PluginSummary {
            name: name.into(),
            role,
            description: description.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_serialization() {
        let document = PluginDocument::summary("echo", PluginRole::Destination, "\n  Echoes text.\n");
        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({"name": "echo", "type": "destination", "description": "Echoes text."})
        );
    }

    #[test]
    fn test_custom_document_is_passed_through() {
        let document = PluginDocument::Custom(json!({"name": "json", "fields": ["a"]}));
        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({"name": "json", "fields": ["a"]})
        );
    }
}
