use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::payments::stripe::StripeError;
use crate::scrape::ScrapeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Wire shape is the `{error, details?}` envelope the web client expects.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Payment error: {0}")]
    Payment(#[from] StripeError),

    #[error("Signature verification failed: {0}")]
    SignatureVerification(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "Validation error", Some(msg.clone()))
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required",
                None,
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Premium feature not unlocked for this resume",
                None,
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", Some(msg.clone())),
            AppError::Scrape(ScrapeError::UnsupportedBoard(host)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Unsupported job board",
                Some(host.clone()),
            ),
            AppError::Scrape(e) => {
                tracing::error!("Scrape error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch upstream data",
                    Some(e.to_string()),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI generation failed",
                    Some(msg.clone()),
                )
            }
            AppError::Payment(e) => {
                tracing::error!("Payment error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Payment provider request failed",
                    None,
                )
            }
            AppError::SignatureVerification(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid webhook signature",
                Some(msg.clone()),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred",
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred",
                    None,
                )
            }
        };

        let body = match details {
            Some(details) => json!({ "error": error, "details": details }),
            None => json!({ "error": error }),
        };

        (status, Json(body)).into_response()
    }
}
