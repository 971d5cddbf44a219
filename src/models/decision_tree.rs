//! Decision tree regressor
//!
//! Trees are stored as a flat node arena with the root at index 0. Children
//! always have a larger index than their parent, which keeps traversal
//! iterative and rules out cycles.

use crate::error::{InferenceError, StartupError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::Regressor;

/// Decision tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Leaf node with prediction value
    Leaf { value: f64 },
    /// Internal node; rows with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Fitted tree structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Check the arena is well formed for inputs with `n_features` columns
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        let n_nodes = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {}: leaf value is not finite", idx));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {}: feature {} out of range for {} features",
                            idx, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {}: threshold is not finite", idx));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= n_nodes {
                            return Err(format!("node {}: invalid child index {}", idx, child));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Predict a single row.
    ///
    /// A root-to-leaf path visits each node at most once, so traversal stops
    /// with an error after `nodes.len()` steps on an arena that was never
    /// validated.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = row.get(*feature).ok_or(InferenceError::ShapeMismatch {
                        expected: feature + 1,
                        actual: row.len(),
                    })?;
                    idx = if *x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(InferenceError::Worker(format!(
                        "tree node {} does not exist",
                        idx
                    )))
                }
            }
        }
        Err(InferenceError::Worker(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }

    /// Get number of leaves
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    /// Get tree depth (a lone leaf has depth 1)
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        if let Some(root) = depths.first_mut() {
            *root = 1;
        }
        let mut max_depth = 0;
        for (idx, node) in self.nodes.iter().enumerate() {
            let d = depths[idx];
            max_depth = max_depth.max(d);
            if let TreeNode::Split { left, right, .. } = *node {
                for child in [left, right] {
                    if let Some(slot) = depths.get_mut(child) {
                        *slot = (*slot).max(d + 1);
                    }
                }
            }
        }
        max_depth
    }
}

/// Single decision tree regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    n_features: usize,
    tree: Tree,
}

impl DecisionTree {
    pub fn new(n_features: usize, tree: Tree) -> Result<Self, StartupError> {
        let model = Self { n_features, tree };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<(), StartupError> {
        self.tree
            .validate(self.n_features)
            .map_err(|reason| StartupError::invalid("model", reason))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

impl Regressor for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, InferenceError> {
        super::check_shape(x, self.n_features)?;
        x.rows()
            .into_iter()
            .map(|row| {
                let row = row.to_vec();
                self.tree.predict_row(&row)
            })
            .collect::<Result<Vec<f64>, _>>()
            .map(Array1::from_vec)
    }
}
