use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::utils::response::{client_error, server_error};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Referential integrity error: {0}")]
    ReferentialIntegrity(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error")]
    Database(#[from] mongodb::error::Error),

    #[error("Upstream fetch error")]
    UpstreamFetch(#[from] reqwest::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ReferentialIntegrity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AppError::Validation(msg)
            | AppError::ReferentialIntegrity(msg)
            | AppError::NotFound(msg)
            | AppError::Config(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::Database(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::UpstreamFetch(e) => {
                error!(error = ?e, "Upstream fetch error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal details
        self.log();

        if status.is_client_error() {
            let message = match &self {
                AppError::Validation(msg)
                | AppError::ReferentialIntegrity(msg)
                | AppError::NotFound(msg) => msg.clone(),
                _ => "Bad request".to_string(),
            };
            return client_error(status, message);
        }

        // Do not expose internal details in the API response
        let detail = match &self {
            AppError::Database(_) => "A database error occurred",
            AppError::Config(_) => "Database configuration error",
            AppError::UpstreamFetch(_) => "An upstream request failed",
            _ => "An unexpected error occurred",
        };

        server_error(status, "Request processing failed", detail)
    }
}
