//! HTTP server exposing the news classifier.
//!
//! Routes:
//!
//! - `GET /`: health check, `{"message": "API running"}`
//! - `POST /predict`: `{"text": ...}` in, `{"label", "confidence", "note"?}` out

mod dto;
mod error;
mod handlers;

pub use error::AppError;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::body::Body;
use axum::http::{HeaderValue, Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;
use veritas_config::{ModelPaths, ServerConfig};
use veritas_engine::Predictor;
use veritas_model::{LoadError, ModelSource};

/// Shared, read-only state handed to every request.
pub struct ServerState {
    pub predictor: Predictor,
}

impl ServerState {
    pub fn new(predictor: Predictor) -> Self {
        Self { predictor }
    }

    /// Loads the pipeline from its configured location, extracting the
    /// archive first when only the archive exists.
    pub fn load(paths: &ModelPaths) -> Result<Self, LoadError> {
        let source = ModelSource::new(paths.extracted_path(), paths.archive_path());
        let pipeline = source.load()?;
        Ok(Self::new(Predictor::new(Arc::new(pipeline))))
    }
}

/// Restricts cross-origin access to the configured origins. Methods and
/// headers requested by those origins are mirrored back.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| o.parse::<HeaderValue>().with_context(|| format!("invalid CORS origin '{}'", o)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

pub fn build_router(state: Arc<ServerState>, config: &ServerConfig) -> anyhow::Result<Router> {
    let cors = cors_layer(&config.cors_origins)?;

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/predict", post(handlers::predict::predict))
        .layer(trace_layer);

    Ok(Router::new()
        .merge(logged_routes)
        .route("/", get(handlers::root))
        .layer(cors)
        .with_state(state))
}
