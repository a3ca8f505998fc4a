//! Webhook destination.
//!
//! Posts the rendered source to a configured URL through the shared
//! `HTTP_CLIENT`, wrapping the content in a one-field JSON object.

use std::time::{Duration, Instant};

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::{Map, Value, json};

use crate::config::{WebhookFormat, WebhookSettings};
use crate::external::client::HTTP_CLIENT;
use crate::plugins::{
    Delivery, Destination, DestinationFactory, PluginError, PluginResult, Source,
};

const NAME: &str = "webhook";

pub struct WebhookFactory {
    settings: WebhookSettings,
}

impl WebhookFactory {
    pub fn new(settings: WebhookSettings) -> Self {
        Self { settings }
    }
}

impl DestinationFactory for WebhookFactory {
    fn description(&self) -> &str {
        "A destination that forwards the rendered notification to a configured HTTP endpoint."
    }

    fn render_documentation(&self) -> Option<Value> {
        Some(json!({
            "name": NAME,
            "type": "destination",
            "description": self.description(),
            "configured": self.settings.url.is_some(),
            "method": self.settings.method,
            "format": self.settings.format,
            "table_format": self.settings.table_format,
            "body_field": self.settings.body_field,
            "requires_token": self.settings.token.is_some(),
        }))
    }

    fn create(&self) -> PluginResult<Box<dyn Destination>> {
        let url = self
            .settings
            .url
            .as_deref()
            .ok_or_else(|| PluginError::configuration(NAME, "plugins.webhook.url is not set"))?;
        let url = Url::parse(url)
            .map_err(|e| PluginError::configuration(NAME, format!("invalid url: {}", e)))?;
        let method = self.settings.method.parse::<Method>().map_err(|_| {
            PluginError::configuration(
                NAME,
                format!("invalid HTTP method: {}", self.settings.method),
            )
        })?;

        Ok(Box::new(WebhookDestination {
            url,
            method,
            settings: self.settings.clone(),
        }))
    }
}

pub struct WebhookDestination {
    url: Url,
    method: Method,
    settings: WebhookSettings,
}

/// Compares secrets without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl WebhookDestination {
    /// Checks the caller's secret against the configured token.
    ///
    /// Only the secret part of the credentials is compared: a Basic
    /// username is accepted whatever it is.
    fn authorize(&self, source: &dyn Source) -> PluginResult<()> {
        let Some(expected) = self.settings.token.as_deref() else {
            return Ok(());
        };

        match source.authorization() {
            Some(credentials)
                if constant_time_eq(credentials.secret().as_bytes(), expected.as_bytes()) =>
            {
                Ok(())
            }
            Some(_) => Err(PluginError::unauthorized("Invalid credentials")),
            None => Err(PluginError::unauthorized("Credentials are required")),
        }
    }

    fn render(&self, source: &dyn Source) -> PluginResult<String> {
        match self.settings.format {
            WebhookFormat::Text => source.to_text(),
            WebhookFormat::Markdown => source.to_markdown(self.settings.table_format.as_deref()),
        }
    }
}

#[async_trait]
impl Destination for WebhookDestination {
    fn name(&self) -> &str {
        NAME
    }

    async fn notify(&self, source: &dyn Source) -> PluginResult<Delivery> {
        self.authorize(source)?;
        let content = self.render(source)?;

        let mut body = Map::new();
        body.insert(self.settings.body_field.clone(), Value::String(content));

        let mut request = HTTP_CLIENT
            .request(self.method.clone(), self.url.clone())
            .timeout(Duration::from_secs(self.settings.timeout_seconds))
            .json(&body);
        for (key, value) in &self.settings.headers {
            request = request.header(key, value);
        }

        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| PluginError::delivery(NAME, e))?;
        let status = response.status();
        let duration_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PluginError::delivery(
                NAME,
                anyhow!("{} responded with {}: {}", self.url, status, text),
            ));
        }

        tracing::info!(
            url = %self.url,
            status = status.as_u16(),
            duration_ms = duration_ms,
            source = source.name(),
            "Webhook delivered"
        );

        Delivery::json(&json!({
            "delivered": true,
            "status": status.as_u16(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::builtin::{FormFactory, SampleFactory};
    use crate::plugins::{Credentials, RawRequest, SourceFactory};
    use axum::http::StatusCode;
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(url: Option<String>) -> WebhookSettings {
        WebhookSettings {
            url,
            ..Default::default()
        }
    }

    fn form_source(body: &'static str, credentials: Option<Credentials>) -> Box<dyn Source> {
        let mut request = RawRequest::new(body);
        request.credentials = credentials;
        FormFactory.ingest(request).unwrap()
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"s3cret", b"s3cret"));
        assert!(!constant_time_eq(b"s3cret", b"s3creT"));
        assert!(!constant_time_eq(b"s3cret", b"s3cre"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_create_requires_url() {
        let error = WebhookFactory::new(settings(None)).create().err().unwrap();
        assert!(matches!(error, PluginError::Configuration { .. }));
    }

    #[test]
    fn test_create_rejects_bad_method() {
        let factory = WebhookFactory::new(WebhookSettings {
            url: Some("http://localhost/hook".to_string()),
            method: "BAD METHOD".to_string(),
            ..Default::default()
        });
        assert!(matches!(
            factory.create().err().unwrap(),
            PluginError::Configuration { .. }
        ));
    }

    #[test]
    fn test_documentation_hides_secrets() {
        let factory = WebhookFactory::new(WebhookSettings {
            url: Some("http://localhost/hook".to_string()),
            token: Some("hunter2".to_string()),
            ..Default::default()
        });
        let document = factory.render_documentation().unwrap();
        assert_eq!(document["configured"], true);
        assert_eq!(document["requires_token"], true);
        assert!(!document.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn test_delivers_text_as_json_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("x-team", "ops"))
            .and(body_json(json!({"text": "host: web-1"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = BTreeMap::new();
        headers.insert("X-Team".to_string(), "ops".to_string());
        let factory = WebhookFactory::new(WebhookSettings {
            url: Some(format!("{}/hook", server.uri())),
            headers,
            ..Default::default()
        });

        let destination = factory.create().unwrap();
        let source = form_source("host=web-1", None);
        let delivery = destination.notify(source.as_ref()).await.unwrap();

        assert_eq!(delivery.status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&delivery.body).unwrap();
        assert_eq!(body, json!({"delivered": true, "status": 204}));
    }

    #[tokio::test]
    async fn test_markdown_format_and_custom_field() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(body_json(json!({
                "content": "| Field | Values |\n|-------|--------|\n| a     | 1      |"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let factory = WebhookFactory::new(WebhookSettings {
            url: Some(server.uri()),
            method: "PUT".to_string(),
            format: WebhookFormat::Markdown,
            body_field: "content".to_string(),
            ..Default::default()
        });

        let destination = factory.create().unwrap();
        let source = form_source("a=1", None);
        assert!(destination.notify(source.as_ref()).await.is_ok());
    }

    #[tokio::test]
    async fn test_upstream_error_is_delivery_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let destination = WebhookFactory::new(settings(Some(server.uri())))
            .create()
            .unwrap();
        let source = SampleFactory.ingest(RawRequest::default()).unwrap();
        let error = destination.notify(source.as_ref()).await.unwrap_err();

        assert!(matches!(error, PluginError::Delivery { .. }));
        assert!(!error.is_client_error());
    }

    #[tokio::test]
    async fn test_token_is_enforced_before_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let destination = WebhookFactory::new(WebhookSettings {
            url: Some(server.uri()),
            token: Some("s3cret".to_string()),
            ..Default::default()
        })
        .create()
        .unwrap();

        let missing = form_source("a=1", None);
        let error = destination.notify(missing.as_ref()).await.unwrap_err();
        assert!(matches!(error, PluginError::Unauthorized { .. }));

        let wrong = form_source(
            "a=1",
            Some(Credentials::Bearer {
                token: "guess".to_string(),
            }),
        );
        let error = destination.notify(wrong.as_ref()).await.unwrap_err();
        assert!(matches!(error, PluginError::Unauthorized { .. }));

        let prefix = form_source(
            "a=1",
            Some(Credentials::Bearer {
                token: "s3cre".to_string(),
            }),
        );
        let error = destination.notify(prefix.as_ref()).await.unwrap_err();
        assert!(matches!(error, PluginError::Unauthorized { .. }));

        let basic = form_source(
            "a=1",
            Some(Credentials::Basic {
                username: "ops".to_string(),
                password: "s3cret".to_string(),
            }),
        );
        assert!(destination.notify(basic.as_ref()).await.is_ok());
    }

    #[tokio::test]
    async fn test_basic_username_is_not_checked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let destination = WebhookFactory::new(WebhookSettings {
            url: Some(server.uri()),
            token: Some("s3cret".to_string()),
            ..Default::default()
        })
        .create()
        .unwrap();

        let anyone = form_source(
            "a=1",
            Some(Credentials::Basic {
                username: String::new(),
                password: "s3cret".to_string(),
            }),
        );
        assert!(destination.notify(anyone.as_ref()).await.is_ok());
    }
}
