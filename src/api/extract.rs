//! Extractor turning an HTTP request into a plugin-facing [`RawRequest`].

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
};

use crate::error::AppError;
use crate::plugins::{Credentials, RawRequest};

impl<S> FromRequest<S> for RawRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = request.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let credentials = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Credentials::parse);

        let body = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| AppError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;

        Ok(RawRequest {
            body,
            content_type,
            credentials,
        })
    }
}
