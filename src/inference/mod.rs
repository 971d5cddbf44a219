//! Inference module
//!
//! Turns scaled feature rows into rounded charge predictions.

mod engine;

pub use engine::{round2, PredictionResult, Predictor};
