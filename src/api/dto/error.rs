//! Error response DTOs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Uniform error body. `error` always equals the response status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = 404)]
    pub error: u16,
    #[schema(example = "Not Found")]
    pub message: String,
}

/// A status given either as a number or as `"<code> <reason>"` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusInput {
    Code(i64),
    Text(String),
}

impl StatusInput {
    /// Resolves to a valid HTTP status, falling back to 400.
    pub fn resolve(&self) -> StatusCode {
        let code = match self {
            StatusInput::Code(code) => Some(*code),
            StatusInput::Text(text) => text
                .split_whitespace()
                .next()
                .and_then(|token| token.parse::<i64>().ok()),
        };

        code.filter(|code| (100..=599).contains(code))
            .and_then(|code| u16::try_from(code).ok())
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::BAD_REQUEST)
    }
}

impl From<u16> for StatusInput {
    fn from(code: u16) -> Self {
        StatusInput::Code(i64::from(code))
    }
}

impl From<i32> for StatusInput {
    fn from(code: i32) -> Self {
        StatusInput::Code(i64::from(code))
    }
}

impl From<i64> for StatusInput {
    fn from(code: i64) -> Self {
        StatusInput::Code(code)
    }
}

impl From<&str> for StatusInput {
    fn from(text: &str) -> Self {
        StatusInput::Text(text.to_string())
    }
}

impl From<String> for StatusInput {
    fn from(text: String) -> Self {
        StatusInput::Text(text)
    }
}

impl From<StatusCode> for StatusInput {
    fn from(status: StatusCode) -> Self {
        StatusInput::Code(i64::from(status.as_u16()))
    }
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, status: impl Into<StatusInput>) -> Self {
        Self {
            error: status.into().resolve().as_u16(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error).unwrap_or(StatusCode::BAD_REQUEST)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
