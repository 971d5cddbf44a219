//! Insurance charges prediction service
//!
//! Serves a pre-trained regression model over HTTP. Given the demographic and
//! health attributes of an insured person it returns a predicted charge.
//!
//! The request path is linear:
//! - [`validation`] checks the raw JSON body
//! - [`preprocessing`] encodes categoricals, orders columns and standardizes
//! - [`inference`] runs the model and rounds the result
//! - [`server`] maps outcomes to HTTP responses
//!
//! Model, scaler and vocabularies live in an immutable
//! [`artifacts::InferenceContext`] built once at startup.

pub mod error;

pub mod artifacts;
pub mod inference;
pub mod models;
pub mod preprocessing;
pub mod validation;

pub mod cli;
pub mod server;

pub use error::{ChargesError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::artifacts::{ArtifactPaths, InferenceContext};
    pub use crate::error::{
        ChargesError, EncodingError, InferenceError, Result, StartupError, ValidationError,
    };
    pub use crate::inference::{PredictionResult, Predictor};
    pub use crate::models::{ModelArtifact, Regressor};
    pub use crate::preprocessing::{CategoricalField, Encoder, FeaturePipeline, Scaler};
    pub use crate::validation::{validate, PredictionRequest};
}
