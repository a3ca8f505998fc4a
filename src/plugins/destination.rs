//! Destination plugin contract.

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;

use super::error::{PluginError, PluginResult};
use super::source::Source;
use crate::state::AppState;

/// A request-scoped destination instance.
///
/// `notify` asks the source to render itself, performs the delivery side
/// effect and reports the outcome. The outcome goes back to the caller as is.
#[async_trait]
pub trait Destination: Send + Sync {
    /// Registered name of the plugin this instance belongs to
    fn name(&self) -> &str;

    async fn notify(&self, source: &dyn Source) -> PluginResult<Delivery>;
}

/// Registered constructor for a destination plugin.
///
/// Destinations are built without request data; whatever they need comes
/// from settings captured when the factory was registered.
pub trait DestinationFactory: Send + Sync {
    /// Static free-text description
    fn description(&self) -> &str {
        ""
    }

    /// Rich self-description, or `None` to use the generated summary
    fn render_documentation(&self) -> Option<Value> {
        None
    }

    /// Extra HTTP endpoints, mounted under `/{name}`
    fn routes(&self) -> Option<OpenApiRouter<AppState>> {
        None
    }

    fn create(&self) -> PluginResult<Box<dyn Destination>>;
}

/// Response extension marking a response a destination produced.
///
/// The HTTP error rewriting leaves marked responses alone whatever their
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveredResponse;

/// The response a destination produced
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

impl Delivery {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: Bytes::from(body.into()),
        }
    }

    pub fn json<T: Serialize>(value: &T) -> PluginResult<Self> {
        let body = serde_json::to_vec(value)
            .map_err(|e| PluginError::render("delivery", e.to_string()))?;
        Ok(Self {
            status: StatusCode::OK,
            content_type: "application/json".to_string(),
            body: Bytes::from(body),
        })
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for Delivery {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Ok(value) = self.content_type.parse() {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response.extensions_mut().insert(DeliveredResponse);
        response
    }
}
