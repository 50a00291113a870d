//! HTTP error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::ErrorKind;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    Validation,
    NotFound,
    Store,
    PayloadTooLarge,
}

/// Error envelope returned by every route
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: ApiErrorKind,
    pub message: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    success: bool,
    message: &'a str,
    error: ErrorBody<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    kind: ApiErrorKind,
    detail: &'a str,
}

impl ApiError {
    /// Map a service error: validation and store failures are 400, a missing
    /// thought is 404.
    pub fn from_error(err: Error, message: impl Into<String>) -> Self {
        let message = message.into();
        let (status, kind) = match err.kind() {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, ApiErrorKind::Validation),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, ApiErrorKind::NotFound),
            ErrorKind::Store => (StatusCode::BAD_REQUEST, ApiErrorKind::Store),
        };

        if kind == ApiErrorKind::Store {
            tracing::error!(error = %err, "{}", message);
        } else {
            tracing::debug!(error = %err, "{}", message);
        }

        Self {
            status,
            kind,
            message,
            detail: err.public_detail(),
        }
    }

    /// Same as [`ApiError::from_error`] but reported as 503.
    pub fn unavailable(err: Error, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            ..Self::from_error(err, message)
        }
    }

    /// A body the JSON parser refused. Anything but an oversized body is
    /// treated like a missing message.
    pub fn from_rejection(rejection: JsonRejection, message: impl Into<String>) -> Self {
        let (status, kind) = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            (StatusCode::PAYLOAD_TOO_LARGE, ApiErrorKind::PayloadTooLarge)
        } else {
            (StatusCode::BAD_REQUEST, ApiErrorKind::Validation)
        };

        Self {
            status,
            kind,
            message: message.into(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            success: false,
            message: &self.message,
            error: ErrorBody {
                kind: self.kind,
                detail: &self.detail,
            },
        };

        (self.status, Json(body)).into_response()
    }
}
