//! API error types and responses

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use cashcard_core::CoreError;
use cashcard_gate::GateError;

use crate::storage::StorageError;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Authentication failed; carries the `WWW-Authenticate` challenge
    #[error("Unauthorized")]
    Unauthorized { challenge: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// 401 carrying `challenge` as its `WWW-Authenticate` value
    pub fn unauthorized(challenge: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            challenge: challenge.into(),
        }
    }

    /// Map a gate rejection to 401 with `challenge`; backend failures stay 500
    pub fn from_gate(err: GateError, challenge: impl Into<String>) -> Self {
        match err {
            GateError::Internal(msg) => ApiError::Internal(msg),
            _ => ApiError::unauthorized(challenge),
        }
    }
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            // Unknown user and bad password look the same from outside.
            ApiError::Unauthorized { .. } => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Bad credentials".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            // Missing and not-yours look the same from outside.
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Cash card not found".to_string(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::Unauthorized { challenge } = &self {
            if let Ok(value) = HeaderValue::from_str(challenge) {
                response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
