#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tower::ServiceExt;
use veritas_config::ServerConfig;
use veritas_core::{ClassId, Classifier, ModelError, SparseVector, Vectorizer};
use veritas_engine::Predictor;
use veritas_model::{ModelArtifact, Pipeline};
use veritas_server::{build_router, ServerState};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const REAL_SAMPLE: &str =
    "The government announced an official report on the budget after the senate vote.";

pub const MODEL_JSON: &str = r#"{
    "format_version": 1,
    "name": "news-test",
    "vectorizer": {
        "kind": "tfidf",
        "vocabulary": {
            "government": 0, "announced": 1, "official": 2, "report": 3,
            "shocking": 4, "secret": 5, "miracle": 6, "aliens": 7
        },
        "idf": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
    },
    "classifier": {
        "kind": "logistic_regression",
        "classes": [0, 1],
        "coef": [[2.0, 2.0, 2.0, 2.0, -2.5, -2.5, -2.5, -2.5]],
        "intercept": [0.0]
    }
}"#;

pub fn news_pipeline() -> Pipeline {
    let artifact = ModelArtifact::from_json(MODEL_JSON).unwrap();
    Pipeline::from_artifact(artifact).unwrap()
}

pub fn app_with(pipeline: Pipeline) -> Router {
    let state = Arc::new(ServerState::new(Predictor::new(Arc::new(pipeline))));
    build_router(state, &ServerConfig::default()).unwrap()
}

pub fn test_app() -> Router {
    app_with(news_pipeline())
}

pub fn write_archive(path: &Path, entry: &str, content: &str) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    zip.start_file(entry, SimpleFileOptions::default()).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
    zip.finish().unwrap();
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub fn post_predict(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Counts occurrences of "news" into a single feature.
pub struct Keyword;

impl Vectorizer for Keyword {
    fn kind(&self) -> &'static str {
        "keyword"
    }

    fn n_features(&self) -> usize {
        1
    }

    fn transform(&self, text: &str) -> Result<SparseVector, ModelError> {
        let hits = text.matches("news").count() as f64;
        SparseVector::from_entries(1, vec![(0, hits)])
    }
}

/// Expects more features than [`Keyword`] produces.
pub struct Wide;

impl Classifier for Wide {
    fn kind(&self) -> &'static str {
        "wide"
    }

    fn n_features(&self) -> usize {
        4
    }

    fn classes(&self) -> &[ClassId] {
        &[0, 1]
    }

    fn predict(&self, features: &SparseVector) -> Result<ClassId, ModelError> {
        features.dot(&[1.0; 4]).map(|score| ClassId::from(score > 0.0))
    }
}
