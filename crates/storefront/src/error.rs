//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. API handlers return `Result<T, AppError>`.
//!
//! Every error response is a JSON object with a single `error` message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::{Entity, RepositoryError, StoreError};

/// Message returned for errors whose details stay server-side.
const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A collection could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Requested product or cart does not exist.
    #[error("Not found: {0}")]
    NotFound(Entity),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Store(e) => Self::Storage(e),
            RepositoryError::NotFound(entity) => Self::NotFound(entity),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Client-facing message for a missing entity.
#[must_use]
pub fn not_found_message(entity: Entity) -> String {
    format!(
        "{} no encontrado o no existe en la base de datos.",
        entity.display_name()
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match self {
            Self::Storage(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            Self::NotFound(entity) => not_found_message(entity),
            Self::BadRequest(message) => message,
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
