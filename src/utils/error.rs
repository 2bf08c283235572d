//! The `error` module defines the error types used within `pollsub`.
//!
//! `BrokerError` covers faults raised by the topic store itself, while
//! `ApiError` is what HTTP handlers return and knows how to turn itself into a
//! response with the matching status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("{kind} name must not be empty")]
    InvalidName { kind: &'static str },

    /// A thread panicked while holding the store lock.
    #[error("broker state lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("could not encode response: {0}")]
    Encode(serde_json::Error),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Broker(BrokerError::InvalidName { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Broker(BrokerError::Poisoned) | ApiError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
