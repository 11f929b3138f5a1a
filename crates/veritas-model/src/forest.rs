//! Random forest classifier over flattened decision trees.

use serde::{Deserialize, Serialize};
use veritas_core::{ClassId, Classifier, ModelError, SparseVector};

use crate::{argmax, validate_classes};

/// A node of a flattened decision tree. Node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Samples with `x[feature] <= threshold` go to `left`, others to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights, aligned with the forest's classes.
    Leaf { value: Vec<f64> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSpec {
    pub classes: Vec<ClassId>,
    pub n_features: usize,
    pub trees: Vec<TreeSpec>,
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Validates the tree and normalizes leaf weights into distributions.
    ///
    /// Children must point forward, which rules out cycles and bounds every
    /// traversal by the node count.
    fn from_spec(spec: TreeSpec, n_classes: usize, n_features: usize) -> Result<Self, ModelError> {
        if spec.nodes.is_empty() {
            return Err(ModelError::invalid("random_forest contains an empty tree"));
        }

        let n_nodes = spec.nodes.len();
        let mut nodes = Vec::with_capacity(n_nodes);

        for (idx, node) in spec.nodes.into_iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if feature >= n_features {
                        return Err(ModelError::invalid(format!(
                            "tree node {} splits on feature {} of {}",
                            idx, feature, n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::invalid(format!("tree node {} has a non-finite threshold", idx)));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= n_nodes {
                            return Err(ModelError::invalid(format!(
                                "tree node {} has invalid child {}",
                                idx, child
                            )));
                        }
                    }
                    nodes.push(TreeNode::Split { feature, threshold, left, right });
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(ModelError::invalid(format!(
                            "tree leaf {} has {} weights for {} classes",
                            idx,
                            value.len(),
                            n_classes
                        )));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(ModelError::invalid(format!("tree leaf {} has a negative weight", idx)));
                    }
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return Err(ModelError::invalid(format!("tree leaf {} has no weight", idx)));
                    }
                    nodes.push(TreeNode::Leaf { value: value.into_iter().map(|w| w / total).collect() });
                }
            }
        }

        Ok(Self { nodes })
    }

    fn leaf_distribution(&self, x: &SparseVector) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if x.get(*feature) <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

/// Averages the class distributions of its trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    classes: Vec<ClassId>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn from_spec(spec: ForestSpec) -> Result<Self, ModelError> {
        validate_classes(&spec.classes, "random_forest")?;
        if spec.n_features == 0 {
            return Err(ModelError::invalid("random_forest needs at least one feature"));
        }
        if spec.trees.is_empty() {
            return Err(ModelError::invalid("random_forest has no trees"));
        }

        let n_classes = spec.classes.len();
        let trees = spec
            .trees
            .into_iter()
            .map(|t| DecisionTree::from_spec(t, n_classes, spec.n_features))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { classes: spec.classes, n_features: spec.n_features, trees })
    }

    fn distribution(&self, x: &SparseVector) -> Result<Vec<f64>, ModelError> {
        if x.dim() != self.n_features {
            return Err(ModelError::ShapeMismatch { expected: self.n_features, actual: x.dim() });
        }

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_distribution(x)) {
                *acc += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    fn predict(&self, features: &SparseVector) -> Result<ClassId, ModelError> {
        let proba = self.distribution(features)?;
        Ok(self.classes[argmax(&proba)])
    }

    fn supports_proba(&self) -> bool {
        true
    }

    fn predict_proba(&self, features: &SparseVector) -> Result<Option<Vec<f64>>, ModelError> {
        self.distribution(features).map(Some)
    }
}
