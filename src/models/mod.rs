//! Model artifacts
//!
//! A model artifact is a JSON document tagged by `"kind"`:
//! - `random_forest`: mean of many regression trees
//! - `decision_tree`: a single regression tree
//! - `linear`: ordinary linear regression
//!
//! Artifacts are checked structurally when loaded, so a malformed model fails
//! at startup instead of on the first request.

mod decision_tree;
mod linear;
mod random_forest;

pub use decision_tree::{DecisionTree, Tree, TreeNode};
pub use linear::LinearRegression;
pub use random_forest::RandomForest;

use crate::artifacts::read_json_artifact;
use crate::error::{InferenceError, StartupError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;

/// Trait for fitted regression models
pub trait Regressor: Send + Sync + Debug {
    /// Short model family name
    fn kind(&self) -> &'static str;

    /// Number of input columns the model was fitted on
    fn n_features(&self) -> usize;

    /// Make predictions, one per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, InferenceError>;
}

pub(crate) fn check_shape(x: &Array2<f64>, n_features: usize) -> Result<(), InferenceError> {
    if x.ncols() != n_features {
        return Err(InferenceError::ShapeMismatch {
            expected: n_features,
            actual: x.ncols(),
        });
    }
    Ok(())
}

/// Any supported model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    DecisionTree(DecisionTree),
    Linear(LinearRegression),
}

impl ModelArtifact {
    /// Load a model from a JSON artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StartupError> {
        let model: Self = read_json_artifact(path.as_ref())?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), StartupError> {
        match self {
            ModelArtifact::RandomForest(m) => m.validate(),
            ModelArtifact::DecisionTree(m) => m.validate(),
            ModelArtifact::Linear(m) => m.validate(),
        }
    }

    fn inner(&self) -> &dyn Regressor {
        match self {
            ModelArtifact::RandomForest(m) => m,
            ModelArtifact::DecisionTree(m) => m,
            ModelArtifact::Linear(m) => m,
        }
    }

    /// Trees of a tree-based model; empty for linear models
    pub fn trees(&self) -> &[Tree] {
        match self {
            ModelArtifact::RandomForest(m) => m.trees(),
            ModelArtifact::DecisionTree(m) => std::slice::from_ref(m.tree()),
            ModelArtifact::Linear(_) => &[],
        }
    }
}

impl Regressor for ModelArtifact {
    fn kind(&self) -> &'static str {
        self.inner().kind()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, InferenceError> {
        self.inner().predict(x)
    }
}
