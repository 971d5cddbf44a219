//! Feature pipeline: encode, assemble in training column order, standardize

use crate::error::EncodingError;
use crate::validation::PredictionRequest;
use ndarray::{Array1, Array2, Axis};

use super::encoder::{CategoricalField, Encoder};
use super::scaler::Scaler;
use super::N_FEATURES;

/// Raw feature row in training column order:
/// `(age, sex, bmi, children, smoker, region)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn new(values: [f64; N_FEATURES]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Feature row after standardization, ready for the model
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFeatureVector(Array1<f64>);

impl ScaledFeatureVector {
    pub(crate) fn new(values: Array1<f64>) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &Array1<f64> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single-row matrix view for batch-shaped model APIs
    pub fn to_row(&self) -> Array2<f64> {
        self.0.clone().insert_axis(Axis(0))
    }
}

/// Turns validated requests into scaled feature rows
#[derive(Debug, Clone)]
pub struct FeaturePipeline<'a> {
    encoder: &'a Encoder,
    scaler: &'a Scaler,
}

impl<'a> FeaturePipeline<'a> {
    pub fn new(encoder: &'a Encoder, scaler: &'a Scaler) -> Self {
        Self { encoder, scaler }
    }

    /// Encode categoricals and assemble the raw row
    pub fn encode(&self, req: &PredictionRequest) -> Result<FeatureVector, EncodingError> {
        let sex = self.encoder.encode(CategoricalField::Sex, &req.sex)?;
        let smoker = self.encoder.encode(CategoricalField::Smoker, &req.smoker)?;
        let region = self.encoder.encode(CategoricalField::Region, &req.region)?;

        Ok(FeatureVector::new([
            f64::from(req.age),
            f64::from(sex),
            req.bmi,
            f64::from(req.children),
            f64::from(smoker),
            f64::from(region),
        ]))
    }

    /// Full pipeline: encode, assemble, scale
    pub fn build_features(
        &self,
        req: &PredictionRequest,
    ) -> Result<ScaledFeatureVector, EncodingError> {
        let raw = self.encode(req)?;
        Ok(self.scaler.transform(&raw))
    }
}
