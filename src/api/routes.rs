//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    response::Redirect,
    routing::get,
};
use tower_http::catch_panic::CatchPanicLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::{ApiDoc, declare_plugin_names};
use crate::api::handlers;
use crate::api::middleware::{
    global_error_handler, handle_panic, logging_middleware, not_found, request_id_middleware,
};
use crate::config::ServerConfig;
use crate::state::AppState;

pub const SWAGGER_UI_PATH: &str = "/apidocs";
pub const OPENAPI_PATH: &str = "/apispec.json";

/// First path segments owned by the router itself
const RESERVED_PREFIXES: [&str; 3] = ["notify", "apidocs", "apispec.json"];

/// Nests the endpoints each plugin contributes under `/{name}`.
fn plugin_endpoints(state: &AppState) -> OpenApiRouter<AppState> {
    let mut router = OpenApiRouter::new();
    for (name, endpoints) in state.registry.endpoints() {
        if RESERVED_PREFIXES.contains(&name.as_str()) {
            tracing::warn!(plugin = %name, "Plugin endpoints shadow a built-in route, skipping");
            continue;
        }
        tracing::debug!(plugin = %name, "Mounting plugin endpoints");
        router = router.nest(&format!("/{}", name), endpoints);
    }
    router
}

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID - generates or propagates `x-request-id`
/// 2. Logging - logs requests inside a span carrying the request ID
/// 3. Error handler - rewrites bare error responses into the JSON error body
/// 4. Panic catcher - turns handler panics into 500 responses
///
/// Plugins that contribute endpoints get them mounted under `/{name}`.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let (router, mut openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::notify::notify_routes())
        .merge(plugin_endpoints(&state))
        .split_for_parts();
    declare_plugin_names(&mut openapi, &state.registry);

    router
        .route(
            "/",
            get(|| async { Redirect::temporary(&format!("{}/", SWAGGER_UI_PATH)) }),
        )
        .with_state(state)
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_PATH, openapi))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(server.max_body_size))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
}
