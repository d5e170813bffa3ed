use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};

use super::errors::ApiError;
use super::models::{
    ClientData, ErrorResponse, PredictionResponse, WelcomeResponse, MODEL_UNAVAILABLE_MESSAGE,
    WELCOME_MESSAGE,
};
use super::state::AppState;

/// GET /
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// POST /predict
///
/// Scores one applicant. Without a loaded model the answer is a 200 carrying
/// an `error` field rather than an error status.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClientData>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(client) = payload?;

    let Some(pipeline) = state.model.pipeline() else {
        return Ok(Json(ErrorResponse {
            error: MODEL_UNAVAILABLE_MESSAGE.to_string(),
        })
        .into_response());
    };

    let row = client.to_dataframe()?;
    let prediction = pipeline
        .predict_risk(&row)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("pipeline returned no prediction"))?;

    tracing::debug!(
        label = %prediction.label,
        probability_high = prediction.probability_high,
        "scored applicant"
    );

    Ok(Json(PredictionResponse::from(prediction)).into_response())
}
