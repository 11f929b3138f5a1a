//! On-disk model format: a tagged vectorizer stage and a tagged classifier stage.

use serde::{Deserialize, Serialize};
use veritas_core::{Classifier, ModelError, Vectorizer};

use crate::forest::{ForestSpec, RandomForest};
use crate::linear::{LinearSpec, LinearSvc, LogisticRegression};
use crate::tfidf::{TfidfSpec, TfidfVectorizer};

/// Artifact format understood by this crate.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub vectorizer: VectorizerSpec,
    pub classifier: ClassifierSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorizerSpec {
    Tfidf(TfidfSpec),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression(LinearSpec),
    LinearSvc(LinearSpec),
    RandomForest(ForestSpec),
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn check_version(&self) -> Result<(), ModelError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ModelError::invalid(format!(
                "unsupported format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        Ok(())
    }
}

impl VectorizerSpec {
    pub fn build(self) -> Result<Box<dyn Vectorizer>, ModelError> {
        match self {
            VectorizerSpec::Tfidf(spec) => Ok(Box::new(TfidfVectorizer::from_spec(spec)?)),
        }
    }
}

impl ClassifierSpec {
    pub fn build(self) -> Result<Box<dyn Classifier>, ModelError> {
        match self {
            ClassifierSpec::LogisticRegression(spec) => Ok(Box::new(LogisticRegression::from_spec(spec)?)),
            ClassifierSpec::LinearSvc(spec) => Ok(Box::new(LinearSvc::from_spec(spec)?)),
            ClassifierSpec::RandomForest(spec) => Ok(Box::new(RandomForest::from_spec(spec)?)),
        }
    }
}
