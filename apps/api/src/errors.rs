#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::schema::{field_error_details, FieldError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// End users never see upstream error text: 500-class causes are logged
/// server-side and surfaced with generic messages.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request data")]
    InvalidInput(Vec<FieldError>),

    #[error("OpenAI API key is not configured")]
    MissingCredential,

    #[error("Upstream completion failure: {0}")]
    Upstream(String),

    #[error("Upstream response failed the recommendation schema")]
    MalformedUpstreamResponse(Vec<FieldError>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidInput(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid request data",
                    "details": field_error_details(errors),
                }),
            ),
            AppError::MissingCredential => {
                // Deployment misconfiguration, not user-correctable.
                tracing::error!("OpenAI API key missing — refusing upstream call");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Failed to process request",
                        "message": "Chiave API OpenAI mancante",
                    }),
                )
            }
            AppError::Upstream(detail) => {
                tracing::error!("Upstream completion failure: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Failed to process request",
                        "message": "Impossibile ottenere la consulenza di carriera",
                    }),
                )
            }
            AppError::MalformedUpstreamResponse(errors) => {
                tracing::error!("Invalid recommendation format: {errors:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Failed to generate valid recommendation",
                        "details": field_error_details(errors),
                    }),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to process request" }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to process request" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
