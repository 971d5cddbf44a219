//! Standard scaler artifact

use crate::artifacts::read_json_artifact;
use crate::error::StartupError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::pipeline::{FeatureVector, ScaledFeatureVector};
use super::{FEATURE_NAMES, N_FEATURES};

/// Fitted standard scaler: `(x - mean) / scale` per column.
///
/// Parameters are fixed when the artifact is loaded and never refitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Scaler {
    /// Build a scaler from fitted parameters, checking them against the feature layout
    pub fn new(
        feature_names: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self, StartupError> {
        let scaler = Self {
            feature_names,
            mean,
            scale,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load a scaler from a JSON artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StartupError> {
        let scaler: Self = read_json_artifact(path.as_ref())?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), StartupError> {
        if self.mean.len() != N_FEATURES || self.scale.len() != N_FEATURES {
            return Err(StartupError::invalid(
                "scaler",
                format!(
                    "expected {} columns, got {} means and {} scales",
                    N_FEATURES,
                    self.mean.len(),
                    self.scale.len()
                ),
            ));
        }

        let names_match = self.feature_names.len() == N_FEATURES
            && self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .all(|(a, b)| a == b);
        if !names_match {
            return Err(StartupError::invalid(
                "scaler",
                format!(
                    "feature_names must be {:?}, got {:?}",
                    FEATURE_NAMES, self.feature_names
                ),
            ));
        }

        for (idx, (&mean, &scale)) in self.mean.iter().zip(self.scale.iter()).enumerate() {
            if !mean.is_finite() {
                return Err(StartupError::invalid(
                    "scaler",
                    format!("mean of {} is not finite", FEATURE_NAMES[idx]),
                ));
            }
            if !scale.is_finite() || scale == 0.0 {
                return Err(StartupError::invalid(
                    "scaler",
                    format!("scale of {} must be finite and non-zero", FEATURE_NAMES[idx]),
                ));
            }
        }

        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize a feature vector column by column
    pub fn transform(&self, features: &FeatureVector) -> ScaledFeatureVector {
        let scaled: Array1<f64> = features
            .as_slice()
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&mean, &scale))| (x - mean) / scale)
            .collect();

        ScaledFeatureVector::new(scaled)
    }
}
