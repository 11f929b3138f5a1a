//! The two capabilities a classification pipeline is composed of.

use crate::{ClassId, ModelError, SparseVector};

/// Turns raw text into a sparse feature vector over a fixed vocabulary.
pub trait Vectorizer: Send + Sync {
    /// Short identifier of the vectorizer kind, used in logs.
    fn kind(&self) -> &'static str;
    /// Dimensionality of produced vectors.
    fn n_features(&self) -> usize;
    /// Vectorizes a single document.
    fn transform(&self, text: &str) -> Result<SparseVector, ModelError>;
}

/// Maps a feature vector to a class, optionally with class probabilities.
pub trait Classifier: Send + Sync {
    /// Short identifier of the classifier kind, used in logs.
    fn kind(&self) -> &'static str;
    /// Dimensionality of accepted vectors.
    fn n_features(&self) -> usize;
    /// Known classes, in the order used by [`Classifier::predict_proba`].
    fn classes(&self) -> &[ClassId];
    /// Predicts a single class.
    fn predict(&self, features: &SparseVector) -> Result<ClassId, ModelError>;

    /// Whether [`Classifier::predict_proba`] returns a distribution.
    fn supports_proba(&self) -> bool {
        false
    }

    /// Class probabilities aligned with [`Classifier::classes`], or `None`
    /// when the classifier has no probability estimates.
    fn predict_proba(&self, _features: &SparseVector) -> Result<Option<Vec<f64>>, ModelError> {
        Ok(None)
    }
}
