use axum::http::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::plugins::PluginError;

/// Errors surfaced at the HTTP boundary.
///
/// Every variant maps to one status code; internal variants carry their
/// cause for logging and are never shown to callers.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or both route names are not registered, source first
    #[error("Unsupported source and / or destination: {}", .names.join(", "))]
    UnsupportedPlugins { names: Vec<String> },

    /// No plugin of either role has this name
    #[error("Plugin not found: {name}")]
    PluginNotFound { name: String },

    /// The request body could not be interpreted
    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    /// A request extractor refused the request before it reached a handler
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn unsupported_plugins<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AppError::UnsupportedPlugins {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the failure is the server's fault rather than the caller's
    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Configuration { .. } | AppError::Internal { .. })
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<PluginError> for AppError {
    fn from(error: PluginError) -> Self {
        match error {
            PluginError::Ingest { .. } => AppError::BadRequest {
                message: error.to_string(),
            },
            PluginError::Unauthorized { message } => AppError::Unauthorized { message },
            PluginError::Configuration { ref plugin, .. } => AppError::Configuration {
                key: format!("plugins.{}", plugin),
                source: error.into(),
            },
            other => AppError::Internal {
                source: other.into(),
            },
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = error.field().unwrap_or("settings").to_string();
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::PayloadEncoding;

    #[test]
    fn test_unsupported_plugins_message() {
        let error = AppError::unsupported_plugins(["nope", "nada"]);
        assert_eq!(
            error.to_string(),
            "Unsupported source and / or destination: nope, nada"
        );

        let error = AppError::unsupported_plugins(["nope"]);
        assert_eq!(error.to_string(), "Unsupported source and / or destination: nope");
    }

    #[test]
    fn test_plugin_error_conversion() {
        let error: AppError = PluginError::ingest(PayloadEncoding::Json, "expected value").into();
        assert!(matches!(error, AppError::BadRequest { .. }));
        assert_eq!(error.to_string(), "Invalid JSON payload: expected value");

        let error: AppError = PluginError::unauthorized("Invalid credentials").into();
        assert!(matches!(error, AppError::Unauthorized { ref message } if message == "Invalid credentials"));

        let error: AppError = PluginError::configuration("webhook", "missing url").into();
        assert!(matches!(error, AppError::Configuration { ref key, .. } if key == "plugins.webhook"));
        assert!(error.is_internal());

        let error: AppError = PluginError::render("json", "boom").into();
        assert!(matches!(error, AppError::Internal { .. }));
        assert!(error.is_internal());

        let error: AppError = PluginError::unsupported("sample", "to_text").into();
        assert!(error.is_internal());
    }

    #[test]
    fn test_config_error_conversion_keeps_field() {
        let error: AppError = ConfigError::validation("server.port", "bad").into();
        assert!(matches!(error, AppError::Configuration { ref key, .. } if key == "server.port"));
    }
}
