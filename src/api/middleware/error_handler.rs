//! Error handler for converting errors to the uniform HTTP error body.
//!
//! Every failure path ends up as an [`ErrorResponse`]: application errors
//! through `IntoResponse`, bare framework responses (unmatched methods,
//! extractor rejections) through [`global_error_handler`], unknown routes
//! through [`not_found`] and panics through [`handle_panic`].

use std::any::Any;

use axum::{
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;
use crate::plugins::DeliveredResponse;

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::UnsupportedPlugins { .. } => StatusCode::NOT_FOUND,
        AppError::PluginNotFound { .. } => StatusCode::NOT_FOUND,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Rejected { status, .. } => *status,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    /// Internal variants never expose their cause; it is logged where the
    /// error is raised.
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let message = match &self {
            AppError::PluginNotFound { .. } => reason(status).to_string(),
            AppError::Configuration { .. } | AppError::Internal { .. } => {
                INTERNAL_SERVER_ERROR.to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse::new(message, status).into_response()
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Error")
}

/// Rewrites error responses that are not already JSON into [`ErrorResponse`].
///
/// Client errors keep the framework's message when there is one; server
/// errors always use the canonical reason phrase. Responses produced by a
/// destination are returned untouched.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }
    if response.extensions().get::<DeliveredResponse>().is_some() {
        return response;
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    if is_json {
        return response;
    }

    let (_parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let original_message = String::from_utf8_lossy(&body_bytes).trim().to_string();

    let message = if status.is_client_error() && !original_message.is_empty() {
        original_message
    } else {
        reason(status).to_string()
    };

    ErrorResponse::new(message, status).into_response()
}

/// Fallback for requests that match no route.
pub async fn not_found() -> ErrorResponse {
    ErrorResponse::new(reason(StatusCode::NOT_FOUND), StatusCode::NOT_FOUND)
}

/// Panic handler for `CatchPanicLayer::custom`.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "Request handler panicked");

    ErrorResponse::new(INTERNAL_SERVER_ERROR, StatusCode::INTERNAL_SERVER_ERROR).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware, routing::get};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            error_to_status_code(&AppError::unsupported_plugins(["x"])),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_to_status_code(&AppError::PluginNotFound { name: "x".into() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_to_status_code(&AppError::BadRequest { message: "x".into() }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_to_status_code(&AppError::Unauthorized { message: "x".into() }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_to_status_code(&AppError::Rejected {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                message: "x".into()
            }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            error_to_status_code(&AppError::Internal { source: anyhow::anyhow!("x") }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_unsupported_plugins_body() {
        let response = AppError::unsupported_plugins(["nope", "nada"]).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({
                "error": 404,
                "message": "Unsupported source and / or destination: nope, nada"
            })
        );
    }

    #[tokio::test]
    async fn test_internal_error_is_sanitized() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("connection refused to 10.0.0.1"),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": 500, "message": "Internal Server Error"})
        );
    }

    #[tokio::test]
    async fn test_plugin_not_found_body() {
        let response = AppError::PluginNotFound { name: "x".into() }.into_response();
        assert_eq!(
            body_json(response).await,
            json!({"error": 404, "message": "Not Found"})
        );
    }

    #[tokio::test]
    async fn test_global_handler_rewrites_plain_errors() {
        let app = Router::new()
            .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .route("/boom", get(|| async { (StatusCode::BAD_GATEWAY, "upstream detail") }))
            .layer(middleware::from_fn(global_error_handler));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/teapot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({"error": 418, "message": "short and stout"})
        );

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({"error": 502, "message": "Bad Gateway"})
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/teapot")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await,
            json!({"error": 405, "message": "Method Not Allowed"})
        );
    }

    #[tokio::test]
    async fn test_global_handler_keeps_destination_responses() {
        use crate::plugins::Delivery;

        let app = Router::new()
            .route(
                "/busy",
                get(|| async {
                    Delivery::text("try later").with_status(StatusCode::SERVICE_UNAVAILABLE)
                }),
            )
            .layer(middleware::from_fn(global_error_handler));

        let response = app
            .oneshot(Request::builder().uri("/busy").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"try later");
    }

    #[tokio::test]
    async fn test_handle_panic_payloads() {
        let response = handle_panic(Box::new("static message"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(String::from("owned message")));
        assert_eq!(
            body_json(response).await,
            json!({"error": 500, "message": "Internal Server Error"})
        );
    }
}
