//! Concrete pipeline stages, the artifact format and the model loader.
//!
//! A model on disk is a JSON [`ModelArtifact`] with one tagged vectorizer
//! stage and one tagged classifier stage. [`ModelSource`] finds it (unpacking
//! its ZIP archive if only that is present) and produces a [`Pipeline`].

mod artifact;
mod forest;
mod linear;
mod loader;
mod pipeline;
mod tfidf;

pub use artifact::{ClassifierSpec, ModelArtifact, VectorizerSpec, FORMAT_VERSION};
pub use forest::{ForestSpec, RandomForest, TreeNode, TreeSpec};
pub use linear::{LinearSpec, LinearSvc, LogisticRegression};
pub use loader::{load_pipeline, LoadError, ModelSource};
pub use pipeline::Pipeline;
pub use tfidf::{Norm, TfidfSpec, TfidfVectorizer, DEFAULT_TOKEN_PATTERN};

use veritas_core::{ClassId, ModelError};

/// Index of the largest value; ties resolve to the first.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

pub(crate) fn validate_classes(classes: &[ClassId], kind: &str) -> Result<(), ModelError> {
    if classes.len() < 2 {
        return Err(ModelError::invalid(format!("{} needs at least two classes", kind)));
    }
    let mut sorted = classes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != classes.len() {
        return Err(ModelError::invalid(format!("{} has duplicate classes", kind)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), 1);
        assert_eq!(argmax(&[0.9]), 0);
        assert_eq!(argmax(&[0.1, 0.1]), 0);
    }

    #[test]
    fn test_validate_classes() {
        assert!(validate_classes(&[0, 1], "test").is_ok());
        assert!(validate_classes(&[1], "test").is_err());
        assert!(validate_classes(&[1, 1], "test").is_err());
    }
}
