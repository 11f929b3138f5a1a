//! Real/fake news text classification.
//!
//! A pre-trained pipeline (TF-IDF vectorizer + classifier) is loaded once and
//! shared by a [`Predictor`], which maps text to a [`Label`] and a confidence.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use veritas::prelude::*;
//!
//! let source = ModelSource::new("models/model.json", "models/model.zip");
//! let predictor = Predictor::new(Arc::new(source.load()?));
//!
//! let prediction = predictor.predict("Senate passes the annual budget")?;
//! println!("{} ({:.2})", prediction.label, prediction.confidence);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use veritas_config::{ConfigError, ModelPaths, ServerConfig};
pub use veritas_core::{
    ClassId, Classifier, Label, ModelError, Prediction, SparseVector, Vectorizer, NO_VOCABULARY_NOTE,
};
pub use veritas_engine::Predictor;
pub use veritas_model::{
    load_pipeline, ClassifierSpec, ForestSpec, LinearSpec, LinearSvc, LoadError, LogisticRegression,
    ModelArtifact, ModelSource, Norm, Pipeline, RandomForest, TfidfSpec, TfidfVectorizer, TreeNode,
    TreeSpec, VectorizerSpec, FORMAT_VERSION,
};

/// Convenient imports for applications.
pub mod prelude {
    pub use crate::{
        Label, LoadError, ModelArtifact, ModelError, ModelSource, Pipeline, Prediction, Predictor,
        ServerConfig,
    };
}
