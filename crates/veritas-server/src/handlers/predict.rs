//! Prediction HTTP handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::error;
use veritas_core::Prediction;

use crate::dto::PredictRequest;
use crate::error::AppError;
use crate::ServerState;

/// Classifies the submitted text. Inference is CPU-bound and runs on the
/// blocking pool.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<Prediction>, AppError> {
    let predictor = state.predictor.clone();

    let prediction = tokio::task::spawn_blocking(move || predictor.predict(&req.text))
        .await?
        .map_err(|e| {
            error!("Prediction failed: {}", e);
            AppError::from(e)
        })?;

    Ok(Json(prediction))
}
