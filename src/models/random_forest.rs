//! Random Forest regressor

use crate::error::{InferenceError, StartupError};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::decision_tree::Tree;
use super::Regressor;

/// Random Forest model. The prediction is the mean of all tree outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    /// Number of input columns
    n_features: usize,
    /// Individual trees
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn new(n_features: usize, trees: Vec<Tree>) -> Result<Self, StartupError> {
        let forest = Self { n_features, trees };
        forest.validate()?;
        Ok(forest)
    }

    pub(crate) fn validate(&self) -> Result<(), StartupError> {
        if self.trees.is_empty() {
            return Err(StartupError::invalid("model", "random forest has no trees"));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|reason| {
                StartupError::invalid("model", format!("tree {}: {}", idx, reason))
            })?;
        }
        Ok(())
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }
}

impl Regressor for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, InferenceError> {
        super::check_shape(x, self.n_features)?;

        let rows: Vec<Vec<f64>> = x.rows().into_iter().map(|r| r.to_vec()).collect();

        // Per-tree predictions; collect keeps tree order so the mean is reproducible
        let all_predictions: Vec<Vec<f64>> = self
            .trees
            .par_iter()
            .map(|tree| {
                rows.iter()
                    .map(|row| tree.predict_row(row))
                    .collect::<Result<Vec<f64>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let n_trees = all_predictions.len() as f64;
        let predictions: Vec<f64> = (0..rows.len())
            .map(|i| {
                let sum: f64 = all_predictions.iter().map(|p| p[i]).sum();
                sum / n_trees
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TreeNode;
    use ndarray::array;

    fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Tree {
        Tree::new(vec![
            TreeNode::Split { feature, threshold, left: 1, right: 2 },
            TreeNode::Leaf { value: left },
            TreeNode::Leaf { value: right },
        ])
    }

    #[test]
    fn test_regressor_averages_trees() {
        let forest = RandomForest::new(
            2,
            vec![stump(0, 0.0, 1.0, 3.0), stump(1, 0.0, 10.0, 20.0)],
        )
        .unwrap();

        let x = array![[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0]];
        let predictions = forest.predict(&x).unwrap();
        assert_eq!(predictions.to_vec(), vec![5.5, 6.5, 11.5]);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let trees: Vec<Tree> = (0..64)
            .map(|i| stump(i % 2, 0.1 * i as f64, i as f64 * 0.37, i as f64 * 1.13))
            .collect();
        let forest = RandomForest::new(2, trees).unwrap();
        let x = array![[0.3, 2.2], [5.0, -1.0]];

        let first = forest.predict(&x).unwrap();
        for _ in 0..10 {
            let again = forest.predict(&x).unwrap();
            for (a, b) in first.iter().zip(again.iter()) {
                assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }

    #[test]
    fn test_empty_forest_rejected() {
        assert!(RandomForest::new(6, Vec::new()).is_err());
    }

    #[test]
    fn test_invalid_tree_rejected() {
        let err = RandomForest::new(1, vec![stump(0, 0.0, 1.0, 2.0), stump(3, 0.0, 1.0, 2.0)])
            .unwrap_err();
        assert!(err.to_string().contains("tree 1"));
    }

    #[test]
    fn test_shape_mismatch() {
        let forest = RandomForest::new(2, vec![stump(0, 0.0, 1.0, 2.0)]).unwrap();
        let x = array![[1.0]];
        assert!(matches!(
            forest.predict(&x),
            Err(InferenceError::ShapeMismatch { expected: 2, actual: 1 })
        ));
    }
}
