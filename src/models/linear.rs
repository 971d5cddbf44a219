//! Linear regression

use crate::error::{InferenceError, StartupError};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::Regressor;

/// Fitted linear regression: `x . coefficients + intercept`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    coefficients: Vec<f64>,
    /// Fitted intercept (bias)
    intercept: f64,
}

impl LinearRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, StartupError> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<(), StartupError> {
        if self.coefficients.is_empty() {
            return Err(StartupError::invalid("model", "linear model has no coefficients"));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(StartupError::invalid(
                "model",
                "linear model parameters must be finite",
            ));
        }
        Ok(())
    }
}

impl Regressor for LinearRegression {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, InferenceError> {
        super::check_shape(x, self.coefficients.len())?;
        let coefficients = ArrayView1::from(self.coefficients.as_slice());
        Ok(x.dot(&coefficients) + self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_predict() {
        let model = LinearRegression::new(vec![2.0, -1.0], 0.5).unwrap();
        let x = array![[1.0, 1.0], [0.0, 3.0]];
        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions.to_vec(), vec![1.5, -2.5]);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(LinearRegression::new(vec![1.0, f64::NAN], 0.0).is_err());
        assert!(LinearRegression::new(vec![1.0], f64::INFINITY).is_err());
    }

    #[test]
    fn test_shape_mismatch() {
        let model = LinearRegression::new(vec![1.0; 6], 0.0).unwrap();
        let x = array![[1.0, 2.0]];
        assert!(model.predict(&x).is_err());
    }
}
