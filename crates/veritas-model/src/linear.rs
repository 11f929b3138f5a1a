//! Linear classifiers: logistic regression and linear SVC.

use serde::{Deserialize, Serialize};
use veritas_core::{ClassId, Classifier, ModelError, SparseVector};

use crate::{argmax, validate_classes};

/// Serialized weights of a fitted linear model.
///
/// Binary models carry a single coefficient row whose positive side is
/// `classes[1]`. Multi-class models carry one row per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSpec {
    pub classes: Vec<ClassId>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

/// Shared decision function of every linear classifier.
#[derive(Debug, Clone)]
struct LinearDecision {
    classes: Vec<ClassId>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    n_features: usize,
}

impl LinearDecision {
    fn from_spec(spec: LinearSpec, kind: &str) -> Result<Self, ModelError> {
        validate_classes(&spec.classes, kind)?;

        let expected_rows = if spec.classes.len() == 2 { 1 } else { spec.classes.len() };
        if spec.coef.len() != expected_rows {
            return Err(ModelError::invalid(format!(
                "{} has {} coefficient rows for {} classes",
                kind,
                spec.coef.len(),
                spec.classes.len()
            )));
        }
        if spec.intercept.len() != expected_rows {
            return Err(ModelError::invalid(format!(
                "{} has {} intercepts for {} coefficient rows",
                kind,
                spec.intercept.len(),
                expected_rows
            )));
        }

        let n_features = spec.coef[0].len();
        if n_features == 0 || spec.coef.iter().any(|row| row.len() != n_features) {
            return Err(ModelError::invalid(format!("{} coefficient rows are ragged or empty", kind)));
        }
        let all_finite = spec.coef.iter().flatten().chain(&spec.intercept).all(|w| w.is_finite());
        if !all_finite {
            return Err(ModelError::invalid(format!("{} weights must be finite", kind)));
        }

        Ok(Self {
            classes: spec.classes,
            coef: spec.coef,
            intercept: spec.intercept,
            n_features,
        })
    }

    fn is_binary(&self) -> bool {
        self.classes.len() == 2
    }

    /// One score per coefficient row.
    fn scores(&self, x: &SparseVector) -> Result<Vec<f64>, ModelError> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| x.dot(row).map(|d| d + b))
            .collect()
    }

    fn predict(&self, x: &SparseVector) -> Result<ClassId, ModelError> {
        let scores = self.scores(x)?;
        let idx = if self.is_binary() {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(&scores)
        };
        Ok(self.classes[idx])
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Logistic regression with probability estimates.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    decision: LinearDecision,
}

impl LogisticRegression {
    pub fn from_spec(spec: LinearSpec) -> Result<Self, ModelError> {
        Ok(Self { decision: LinearDecision::from_spec(spec, "logistic_regression")? })
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.decision.n_features
    }

    fn classes(&self) -> &[ClassId] {
        &self.decision.classes
    }

    fn predict(&self, features: &SparseVector) -> Result<ClassId, ModelError> {
        self.decision.predict(features)
    }

    fn supports_proba(&self) -> bool {
        true
    }

    fn predict_proba(&self, features: &SparseVector) -> Result<Option<Vec<f64>>, ModelError> {
        let scores = self.decision.scores(features)?;
        let proba = if self.decision.is_binary() {
            let p = sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            softmax(&scores)
        };
        Ok(Some(proba))
    }
}

/// Linear support vector classifier. Has no probability estimates.
#[derive(Debug, Clone)]
pub struct LinearSvc {
    decision: LinearDecision,
}

impl LinearSvc {
    pub fn from_spec(spec: LinearSpec) -> Result<Self, ModelError> {
        Ok(Self { decision: LinearDecision::from_spec(spec, "linear_svc")? })
    }
}

impl Classifier for LinearSvc {
    fn kind(&self) -> &'static str {
        "linear_svc"
    }

    fn n_features(&self) -> usize {
        self.decision.n_features
    }

    fn classes(&self) -> &[ClassId] {
        &self.decision.classes
    }

    fn predict(&self, features: &SparseVector) -> Result<ClassId, ModelError> {
        self.decision.predict(features)
    }
}
