use axum::extract::Query;
use jiff::Timestamp;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::PLUGIN_TAG;
use crate::api::dto::ErrorResponse;
use crate::error::AppResult;
use crate::plugins::{
    Credentials, PluginResult, RawRequest, Source, SourceFactory, SourceInput, Table,
    TableFormat,
};
use crate::state::AppState;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Source that ignores the request body and reports the current time
pub struct SampleFactory;

impl SourceFactory for SampleFactory {
    fn description(&self) -> &str {
        "A source sample that responds with the current time and a message."
    }

    /// Routes:
    /// - GET /sample/preview - Render a sample notification
    fn routes(&self) -> Option<OpenApiRouter<AppState>> {
        Some(OpenApiRouter::new().routes(routes!(preview)))
    }

    fn create(&self, input: SourceInput) -> PluginResult<Box<dyn Source>> {
        Ok(Box::new(SampleSource {
            time: Timestamp::now(),
            credentials: input.credentials,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PreviewFormat {
    #[default]
    Text,
    Markdown,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// Rendering to preview
    #[serde(default)]
    #[param(inline)]
    pub format: PreviewFormat,
    /// Table style for markdown, `github` when omitted
    pub table_format: Option<String>,
}

/// GET /sample/preview - Render a sample notification
#[utoipa::path(
    get,
    path = "/preview",
    tag = PLUGIN_TAG,
    params(PreviewQuery),
    responses(
        (status = 200, description = "The sample notification as a destination would see it", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
async fn preview(Query(query): Query<PreviewQuery>) -> AppResult<String> {
    let source = SampleFactory.ingest(RawRequest::default())?;
    let rendered = match query.format {
        PreviewFormat::Text => source.to_text()?,
        PreviewFormat::Markdown => source.to_markdown(query.table_format.as_deref())?,
    };
    Ok(rendered)
}

pub struct SampleSource {
    time: Timestamp,
    credentials: Option<Credentials>,
}

impl SampleSource {
    fn time(&self) -> String {
        self.time.strftime(TIME_FORMAT).to_string()
    }
}

impl Source for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    fn to_text(&self) -> PluginResult<String> {
        Ok(format!(
            "This is a sample notification from Notification Router.\nTime: {}",
            self.time()
        ))
    }

    fn to_markdown(&self, table_format: Option<&str>) -> PluginResult<String> {
        let table = Table::new(["Property", "Value"])
            .row([
                "Message",
                "This is a sample notification from Notification Router in Markdown format.",
            ])
            .row(["Time".to_string(), self.time()]);
        Ok(table.render(TableFormat::resolve(table_format)))
    }

    fn authorization(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}
