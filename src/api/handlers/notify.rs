//! Notification routing handlers.
//!
//! Provides the plugin listing, plugin self-description and the routing
//! endpoint that forwards a payload from a source to a destination.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::NOTIFY_TAG;
use crate::api::dto::{ErrorResponse, PluginListResponse};
use crate::error::AppResult;
use crate::plugins::{Delivery, PluginSummary, RawRequest};
use crate::state::AppState;

/// Creates notification routes.
///
/// Routes:
/// - GET /notify                            - List registered plugins
/// - GET /notify/{plugin_name}              - Describe a plugin
/// - POST /notify/{source}/{destination}    - Route a notification
pub fn notify_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_plugins))
        .routes(routes!(view_plugin_detail))
        .routes(routes!(route_notification))
}

/// GET /notify - List registered plugins
#[utoipa::path(
    get,
    path = "/notify",
    tag = NOTIFY_TAG,
    responses(
        (status = 200, description = "Registered source and destination names", body = PluginListResponse)
    )
)]
async fn list_plugins(State(state): State<AppState>) -> Json<PluginListResponse> {
    Json(state.services.documentation.list().into())
}

/// GET /notify/{plugin_name} - Describe a plugin
///
/// Returns one document when the name belongs to a single role and an array
/// of documents, source first, when it is registered under both.
#[utoipa::path(
    get,
    path = "/notify/{plugin_name}",
    tag = NOTIFY_TAG,
    params(
        ("plugin_name" = String, Path, description = "Name of a registered source or destination")
    ),
    responses(
        (status = 200, description = "Plugin self-description", body = PluginSummary),
        (status = 404, description = "No plugin has this name", body = ErrorResponse)
    )
)]
async fn view_plugin_detail(
    State(state): State<AppState>,
    Path(plugin_name): Path<String>,
) -> AppResult<Response> {
    let mut documents = state.services.documentation.describe(&plugin_name)?;

    let response = if documents.len() == 1 {
        Json(documents.remove(0)).into_response()
    } else {
        Json(documents).into_response()
    };
    Ok(response)
}

/// POST /notify/{source}/{destination} - Route a notification
///
/// The body is interpreted by the source plugin; the response is whatever
/// the destination plugin produced.
#[utoipa::path(
    post,
    path = "/notify/{source}/{destination}",
    tag = NOTIFY_TAG,
    params(
        ("source" = String, Path, description = "Source plugin interpreting the payload"),
        ("destination" = String, Path, description = "Destination plugin delivering the notification")
    ),
    request_body(content = String, description = "Payload in the encoding the source expects"),
    responses(
        (status = 200, description = "Response produced by the destination"),
        (status = 400, description = "Malformed payload", body = ErrorResponse),
        (status = 401, description = "Rejected by the destination", body = ErrorResponse),
        (status = 404, description = "Unsupported source and / or destination", body = ErrorResponse),
        (status = 500, description = "Delivery failed", body = ErrorResponse)
    ),
    security((), ("basicAuth" = []), ("bearerAuth" = []))
)]
async fn route_notification(
    State(state): State<AppState>,
    Path((source, destination)): Path<(String, String)>,
    request: RawRequest,
) -> AppResult<Delivery> {
    state
        .services
        .routing
        .route(&source, &destination, request)
        .await
}
