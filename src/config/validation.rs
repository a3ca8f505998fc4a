//! Configuration validation logic
//!
//! Each settings section validates itself; [`Settings::validate`] reports the
//! first problem found.

use reqwest::{Method, Url};

use crate::config::error::ConfigError;
use crate::config::settings::{FileSettings, LoggerSettings, ServerConfig, Settings, WebhookSettings};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Host must not be empty
    /// - Max body size must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host address cannot be empty.",
            ));
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::validation(
                "server.max_body_size",
                "Max body size must be greater than 0 bytes.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()
    }
}

impl WebhookSettings {
    /// Validate webhook destination settings
    ///
    /// An absent URL is valid: the destination stays registered but refuses
    /// to deliver.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            let parsed = Url::parse(url).map_err(|e| {
                ConfigError::validation("plugins.webhook.url", format!("Invalid URL '{}': {}", url, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::validation(
                    "plugins.webhook.url",
                    format!("Unsupported URL scheme '{}'. Use http or https.", parsed.scheme()),
                ));
            }
        }

        if self.method.parse::<Method>().is_err() {
            return Err(ConfigError::validation(
                "plugins.webhook.method",
                format!("Invalid HTTP method '{}'.", self.method),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "plugins.webhook.timeout_seconds",
                "Timeout must be greater than 0 seconds.",
            ));
        }

        if self.body_field.trim().is_empty() {
            return Err(ConfigError::validation(
                "plugins.webhook.body_field",
                "Body field cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.plugins.webhook.validate()?;
        Ok(())
    }
}
