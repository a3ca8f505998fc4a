//! Source plugin contract.
//!
//! A source turns an inbound request into something a destination can
//! render. The [`SourceFactory`] is what gets registered; it describes the
//! plugin without a request and builds one [`Source`] instance per request.

use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;

use super::error::{PluginError, PluginResult};
use super::payload::{Payload, PayloadEncoding};
use super::request::{Credentials, RawRequest};
use crate::state::AppState;

/// Everything a source instance is built from
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub payload: Payload,
    pub content_type: Option<String>,
    pub credentials: Option<Credentials>,
}

/// A request-scoped source instance.
///
/// The rendering capabilities are optional. Implementations that do not
/// provide one keep the default, which returns [`PluginError::Unsupported`].
pub trait Source: Send + Sync {
    /// Registered name of the plugin this instance belongs to
    fn name(&self) -> &str;

    /// Renders the payload as plain text
    fn to_text(&self) -> PluginResult<String> {
        Err(PluginError::unsupported(self.name(), "to_text"))
    }

    /// Renders the payload as a table or markdown document.
    ///
    /// `table_format` names a [`TableFormat`](super::TableFormat); `None`
    /// means GitHub markdown and an unknown name falls back to `simple`.
    fn to_markdown(&self, table_format: Option<&str>) -> PluginResult<String> {
        let _ = table_format;
        Err(PluginError::unsupported(self.name(), "to_markdown"))
    }

    /// Credentials the caller presented, uninterpreted
    fn authorization(&self) -> Option<&Credentials>;
}

/// Registered constructor for a source plugin
pub trait SourceFactory: Send + Sync {
    /// Static free-text description
    fn description(&self) -> &str {
        ""
    }

    /// How request bodies are decoded before [`SourceFactory::create`]
    fn encoding(&self) -> PayloadEncoding {
        PayloadEncoding::Raw
    }

    /// Rich self-description, or `None` to use the generated summary
    fn render_documentation(&self) -> Option<Value> {
        None
    }

    /// Extra HTTP endpoints, mounted under `/{name}`
    fn routes(&self) -> Option<OpenApiRouter<AppState>> {
        None
    }

    fn create(&self, input: SourceInput) -> PluginResult<Box<dyn Source>>;

    /// Decodes the request body with the declared encoding and builds the
    /// instance bound to it
    fn ingest(&self, request: RawRequest) -> PluginResult<Box<dyn Source>> {
        let payload = Payload::decode(self.encoding(), &request.body)?;
        self.create(SourceInput {
            payload,
            content_type: request.content_type,
            credentials: request.credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare {
        credentials: Option<Credentials>,
    }

    impl Source for Bare {
        fn name(&self) -> &str {
            "bare"
        }

        fn authorization(&self) -> Option<&Credentials> {
            self.credentials.as_ref()
        }
    }

    struct BareFactory;

    impl SourceFactory for BareFactory {
        fn encoding(&self) -> PayloadEncoding {
            PayloadEncoding::Json
        }

        fn create(&self, input: SourceInput) -> PluginResult<Box<dyn Source>> {
            Ok(Box::new(Bare {
                credentials: input.credentials,
            }))
        }
    }

    #[test]
    fn test_default_capabilities_are_unsupported() {
        let source = Bare { credentials: None };
        assert!(source.to_text().unwrap_err().is_unsupported());
        assert!(source.to_markdown(Some("grid")).unwrap_err().is_unsupported());
        assert!(source.authorization().is_none());
    }

    #[test]
    fn test_factory_defaults() {
        assert_eq!(BareFactory.description(), "");
        assert!(BareFactory.render_documentation().is_none());
    }

    #[test]
    fn test_ingest_decodes_and_carries_credentials() {
        let request = RawRequest::new("{}").with_credentials(Credentials::Bearer {
            token: "t0k".to_string(),
        });
        let source = BareFactory.ingest(request).unwrap();
        assert_eq!(source.authorization().map(|c| c.secret()), Some("t0k"));
    }

    #[test]
    fn test_ingest_rejects_malformed_body() {
        let error = BareFactory.ingest(RawRequest::new("{oops")).err().unwrap();
        assert!(matches!(error, PluginError::Ingest { .. }));
    }
}
