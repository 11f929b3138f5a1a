//! Core domain types and error definitions for veritas.
//!
//! This crate provides the fundamental types shared across the workspace:
//!
//! - [`ModelError`]: Error type for malformed models and inference failures
//! - [`Label`] and [`Prediction`]: What the prediction service returns
//! - [`SparseVector`]: Feature vector produced by a vectorizer
//! - [`Vectorizer`] and [`Classifier`]: The two pipeline stages
//!
//! # Example
//!
//! ```rust
//! use veritas_core::{Label, Prediction};
//!
//! let empty = Prediction::unknown();
//! assert_eq!(empty.label, Label::Unknown);
//! assert_eq!(empty.confidence, 0.0);
//!
//! assert_eq!(Label::from_class(1), Label::Real);
//! assert_eq!(Label::from_class(0), Label::Fake);
//! ```

mod sparse;
mod stage;

pub use sparse::SparseVector;
pub use stage::{Classifier, Vectorizer};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw integer class emitted by a classifier.
pub type ClassId = i64;

/// Note attached to predictions for text with no recognized vocabulary.
pub const NO_VOCABULARY_NOTE: &str = "No known vocabulary words";

/// Errors raised by malformed models or failed inference.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The model's structure is inconsistent.
    #[error("Invalid model: {0}")]
    Invalid(String),

    /// A feature vector and a weight vector disagree on dimensionality.
    #[error("Shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl ModelError {
    /// Creates an Invalid error from any displayable message.
    pub fn invalid(msg: impl std::fmt::Display) -> Self {
        ModelError::Invalid(msg.to_string())
    }
}

/// Verdict returned for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Classified as real news.
    Real,
    /// Classified as fake news.
    Fake,
    /// Nothing to classify: empty input or no known vocabulary.
    Unknown,
}

impl Label {
    /// Maps a raw classifier output to a label. Class `1` is real news,
    /// every other class is treated as fake.
    pub fn from_class(class: ClassId) -> Self {
        if class == 1 {
            Label::Real
        } else {
            Label::Fake
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Real => "Real",
            Label::Fake => "Fake",
            Label::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a single text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// The verdict.
    pub label: Label,
    /// Probability assigned to the verdict, always within `[0, 1]`.
    pub confidence: f64,
    /// Explanation for degraded results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Prediction {
    /// Creates a classified prediction. Confidence is clamped into `[0, 1]`.
    pub fn classified(label: Label, confidence: f64) -> Self {
        Self { label, confidence: clamp_unit(confidence), note: None }
    }

    /// Prediction for empty or whitespace-only input.
    pub fn unknown() -> Self {
        Self { label: Label::Unknown, confidence: 0.0, note: None }
    }

    /// Prediction for input that shares no vocabulary with the model.
    pub fn out_of_vocabulary() -> Self {
        Self {
            label: Label::Unknown,
            confidence: 0.0,
            note: Some(NO_VOCABULARY_NOTE.to_string()),
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
