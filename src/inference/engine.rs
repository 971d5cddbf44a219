//! Prediction service

use crate::error::InferenceError;
use crate::models::Regressor;
use crate::preprocessing::ScaledFeatureVector;
use serde::{Deserialize, Serialize};

/// Model output returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_charges: f64,
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Runs scaled features through the model
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a> {
    model: &'a dyn Regressor,
}

impl<'a> Predictor<'a> {
    pub fn new(model: &'a dyn Regressor) -> Self {
        Self { model }
    }

    /// Predict charges for one scaled feature row
    pub fn predict(
        &self,
        features: &ScaledFeatureVector,
    ) -> Result<PredictionResult, InferenceError> {
        let output = self.model.predict(&features.to_row())?;

        if output.len() != 1 {
            return Err(InferenceError::OutputCount(output.len()));
        }
        let value = output[0];
        if !value.is_finite() {
            return Err(InferenceError::NonFinite(value));
        }

        Ok(PredictionResult {
            predicted_charges: round2(value),
        })
    }
}
