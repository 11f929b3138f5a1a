//! Prediction service: turns raw text into a [`Prediction`] using a shared
//! [`Pipeline`].
//!
//! The pipeline is loaded once and never mutated, so a [`Predictor`] is a
//! cheap handle that can be cloned into every request.

use std::sync::Arc;

use tracing::debug;
use veritas_core::{Label, ModelError, Prediction};
use veritas_model::Pipeline;

#[derive(Debug, Clone)]
pub struct Predictor {
    pipeline: Arc<Pipeline>,
}

impl Predictor {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Classifies `text`.
    ///
    /// Blank input and input with no known vocabulary yield
    /// [`Label::Unknown`] with zero confidence. Otherwise the confidence is
    /// the probability of the predicted class, or `1.0` when the classifier
    /// has no probabilities or does not list the predicted class.
    pub fn predict(&self, text: &str) -> Result<Prediction, ModelError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Prediction::unknown());
        }

        let features = self.pipeline.vectorize(text)?;
        if features.is_empty() {
            debug!("No known vocabulary in input");
            return Ok(Prediction::out_of_vocabulary());
        }

        let class = self.pipeline.classify(&features)?;
        let label = Label::from_class(class);

        let mut confidence = 1.0;
        if let Some(proba) = self.pipeline.predict_proba(&features)? {
            let position = self.pipeline.classes().iter().position(|c| *c == class);
            if let Some(p) = position.and_then(|idx| proba.get(idx)) {
                confidence = *p;
            }
        }

        let prediction = Prediction::classified(label, confidence);
        debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            n_terms = features.nnz(),
            "Prediction complete"
        );
        Ok(prediction)
    }
}
