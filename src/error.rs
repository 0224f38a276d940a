use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{payments::PaymentError, repository::StoreError};

/// ConfigError
///
/// Raised by `AppConfig::load` when the environment cannot produce a usable
/// configuration. The binary refuses to start on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("environment variable {name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// AppError
///
/// The single failure type surfaced by handlers and by the policy middleware.
/// Every variant renders as `{"success": false, "message": ...}` with the
/// matching HTTP status, so callers always receive the JSON envelope.
#[derive(Debug, Error)]
pub enum AppError {
    /// No token, a malformed header, or a token that failed verification.
    #[error("{0}")]
    Unauthorized(String),

    /// Role or ownership mismatch, or an application that is no longer editable.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Malformed identifiers, bodies, query strings and out-of-range values.
    #[error("{0}")]
    Validation(String),

    /// A lifecycle transition the current state does not allow.
    #[error("{0}")]
    Conflict(String),

    /// Document store failure. Details are logged, never returned.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Payment processor failure. Details are logged, never returned.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Token signing failure.
    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// ErrorBody
///
/// Wire shape of every failed response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// HTTP status for this failure class.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) | Self::Payment(_) | Self::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Store(err) => {
                tracing::error!(error = %err, "document store failure");
                "Database error occurred".to_string()
            }
            Self::Payment(err) => {
                tracing::error!(error = %err, "payment processor failure");
                "Error creating payment intent".to_string()
            }
            Self::Token(err) => {
                tracing::error!(error = %err, "token signing failure");
                "Failed to issue token".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}
