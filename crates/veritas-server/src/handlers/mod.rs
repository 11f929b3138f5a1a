//! HTTP route handlers for the classifier server.

pub mod predict;

use axum::Json;

use crate::dto::StatusResponse;

/// Health check endpoint.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse { message: "API running" })
}
