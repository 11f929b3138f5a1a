//! Vectorizer + classifier composed into a single inference unit.

use std::fmt;

use veritas_core::{ClassId, Classifier, ModelError, SparseVector, Vectorizer};

use crate::artifact::ModelArtifact;

/// Immutable, thread-safe inference pipeline.
pub struct Pipeline {
    name: Option<String>,
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
}

impl Pipeline {
    /// Composes two stages without checking that their dimensions agree.
    pub fn new(vectorizer: Box<dyn Vectorizer>, classifier: Box<dyn Classifier>) -> Self {
        Self { name: None, vectorizer, classifier }
    }

    /// Builds and validates both stages of a parsed artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        artifact.check_version()?;

        let vectorizer = artifact.vectorizer.build()?;
        let classifier = artifact.classifier.build()?;

        if vectorizer.n_features() != classifier.n_features() {
            return Err(ModelError::invalid(format!(
                "{} produces {} features but {} expects {}",
                vectorizer.kind(),
                vectorizer.n_features(),
                classifier.kind(),
                classifier.n_features()
            )));
        }

        Ok(Self { name: artifact.name, vectorizer, classifier })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn classes(&self) -> &[ClassId] {
        self.classifier.classes()
    }

    pub fn vectorize(&self, text: &str) -> Result<SparseVector, ModelError> {
        self.vectorizer.transform(text)
    }

    pub fn classify(&self, features: &SparseVector) -> Result<ClassId, ModelError> {
        self.classifier.predict(features)
    }

    pub fn predict_proba(&self, features: &SparseVector) -> Result<Option<Vec<f64>>, ModelError> {
        self.classifier.predict_proba(features)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("vectorizer", &self.vectorizer.kind())
            .field("classifier", &self.classifier.kind())
            .field("n_features", &self.vectorizer.n_features())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(vocabulary: serde_json::Value, coef: serde_json::Value) -> ModelArtifact {
        serde_json::from_value(serde_json::json!({
            "format_version": 1,
            "vectorizer": {"kind": "tfidf", "vocabulary": vocabulary},
            "classifier": {
                "kind": "logistic_regression",
                "classes": [0, 1],
                "coef": [coef],
                "intercept": [0.0]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_from_artifact_runs_both_stages() {
        let pipeline = Pipeline::from_artifact(artifact(
            serde_json::json!({"official": 0, "hoax": 1}),
            serde_json::json!([3.0, -3.0]),
        ))
        .unwrap();

        let x = pipeline.vectorize("Official statement").unwrap();
        assert_eq!(x.nnz(), 1);
        assert_eq!(pipeline.classify(&x).unwrap(), 1);
        assert_eq!(pipeline.classes(), &[0, 1]);
        assert!(pipeline.predict_proba(&x).unwrap().is_some());
    }

    #[test]
    fn test_from_artifact_rejects_dimension_mismatch() {
        let err = Pipeline::from_artifact(artifact(
            serde_json::json!({"official": 0, "hoax": 1}),
            serde_json::json!([3.0, -3.0, 1.0]),
        ))
        .unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)));
    }

    #[test]
    fn test_debug_names_stages() {
        let pipeline = Pipeline::from_artifact(artifact(
            serde_json::json!({"official": 0}),
            serde_json::json!([1.0]),
        ))
        .unwrap()
        .with_name("tiny");
        let debug = format!("{:?}", pipeline);
        assert!(debug.contains("tfidf"));
        assert!(debug.contains("logistic_regression"));
        assert!(debug.contains("tiny"));
    }
}
