//! Error types for the plugin contract

use thiserror::Error;

use super::payload::PayloadEncoding;

/// Failures raised by sources and destinations.
///
/// `Unsupported` is the tagged "not implemented" outcome of an optional
/// capability. It is a value callers branch on, never an unwinding fault.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin does not provide the requested capability
    #[error("{plugin} does not implement {capability}")]
    Unsupported {
        plugin: String,
        capability: &'static str,
    },

    /// The request body could not be decoded with the source's encoding
    #[error("Invalid {encoding} payload: {reason}")]
    Ingest {
        encoding: PayloadEncoding,
        reason: String,
    },

    /// The destination refused the caller's credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The plugin cannot be constructed with the current process configuration
    #[error("{plugin} is not configured: {reason}")]
    Configuration { plugin: String, reason: String },

    /// The source data could not be rendered
    #[error("Failed to render {plugin} content: {reason}")]
    Render { plugin: String, reason: String },

    /// The outward delivery side effect failed
    #[error("Delivery through {plugin} failed")]
    Delivery {
        plugin: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PluginError {
    pub fn unsupported(plugin: impl Into<String>, capability: &'static str) -> Self {
        Self::Unsupported {
            plugin: plugin.into(),
            capability,
        }
    }

    pub fn ingest(encoding: PayloadEncoding, reason: impl Into<String>) -> Self {
        Self::Ingest {
            encoding,
            reason: reason.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn configuration(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }

    pub fn render(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Render {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }

    pub fn delivery(plugin: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Delivery {
            plugin: plugin.into(),
            source: source.into(),
        }
    }

    /// Whether this is the "capability not implemented" outcome
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Whether the failure was caused by the caller rather than the plugin
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Ingest { .. } | Self::Unauthorized { .. })
    }
}

/// Result alias for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;
