//! Inference-time preprocessing
//!
//! Reproduces the training-time transformations exactly:
//! - Label encoding of categorical fields with fixed vocabularies
//! - Column assembly in training order
//! - Standard scaling with the fitted mean/scale

mod encoder;
mod pipeline;
mod scaler;

pub use encoder::{
    CategoricalField, Encoder, Vocabulary, REGION_VOCABULARY, SEX_VOCABULARY,
    SMOKER_VOCABULARY,
};
pub use pipeline::{FeaturePipeline, FeatureVector, ScaledFeatureVector};
pub use scaler::Scaler;

/// Number of model input columns
pub const N_FEATURES: usize = 6;

/// Model input columns, in the order the scaler and model were fitted on
pub const FEATURE_NAMES: [&str; N_FEATURES] = ["age", "sex", "bmi", "children", "smoker", "region"];
