use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced at the HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed JSON/schema validation
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// Model code failed on a request that passed validation
    #[error("prediction failed: {0:#}")]
    Prediction(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidBody(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                let body = Json(json!({
                    "detail": rejection.body_text(),
                }));
                (rejection.status(), body).into_response()
            }
            ApiError::Prediction(e) => {
                tracing::error!("Prediction error: {:#}", e);
                let body = Json(json!({
                    "error": "Internal server error",
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
