//! HTTP request handlers

use std::fmt;
use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::artifacts::InferenceContext;
use crate::error::ValidationError;
use crate::inference::PredictionResult;
use crate::validation;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Last stage a request completed before it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Received,
    Validated,
    Encoded,
    Scaled,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Encoded => "encoded",
            Stage::Scaled => "scaled",
        };
        f.write_str(name)
    }
}

fn failed(stage: Stage, err: impl Into<ServerError>) -> ServerError {
    let err = err.into();
    info!(stage = %stage, reason = %err, "Prediction request failed");
    err
}

/// Validate → encode → scale → predict. CPU-bound; run off the async runtime.
fn run_pipeline(ctx: &InferenceContext, body: &Value) -> Result<PredictionResult> {
    let req = validation::validate(body).map_err(|e| failed(Stage::Received, e))?;
    let raw = ctx
        .pipeline()
        .encode(&req)
        .map_err(|e| failed(Stage::Validated, e))?;
    let scaled = ctx.scaler().transform(&raw);
    debug!(stage = %Stage::Encoded, features = ?raw.as_slice(), "Features assembled");

    ctx.predictor()
        .predict(&scaled)
        .map_err(|e| failed(Stage::Scaled, e))
}

// ============================================================================
// Inference Handlers
// ============================================================================

/// Predict insurance charges for one person
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    let Json(body) = payload.map_err(|rejection| {
        failed(
            Stage::Received,
            ValidationError::malformed(rejection.body_text()),
        )
    })?;

    let ctx = Arc::clone(&state.context);
    let result = tokio::task::spawn_blocking(move || run_pipeline(&ctx, &body))
        .await
        .map_err(|e| ServerError::Internal(format!("prediction worker failed: {}", e)))??;

    Ok(Json(result))
}

// ============================================================================
// Service Handlers
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let model = state.context.model();
    Json(json!({
        "status": "ok",
        "model": model.kind(),
        "n_features": model.n_features(),
        "uptime_secs": state.uptime_secs(),
    }))
}

/// Service metadata
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "title": "Insurance Charges Prediction API",
        "description": "An API to predict insurance charges based on customer demographics.",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinearRegression;
    use crate::preprocessing::{Scaler, FEATURE_NAMES};

    fn context() -> InferenceContext {
        let scaler = Scaler::new(
            FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            vec![0.0; 6],
            vec![1.0; 6],
        )
        .unwrap();
        // charges = 100 * age + 1000 * smoker
        let model = LinearRegression::new(vec![100.0, 0.0, 0.0, 0.0, 1000.0, 0.0], 0.0).unwrap();
        InferenceContext::from_parts(Arc::new(model), scaler).unwrap()
    }

    #[test]
    fn test_run_pipeline() {
        let body = json!({
            "age": 30, "sex": "female", "bmi": 22.0,
            "children": 1, "smoker": "yes", "region": "northwest"
        });
        let result = run_pipeline(&context(), &body).unwrap();
        assert_eq!(result.predicted_charges, 4000.0);
    }

    #[test]
    fn test_run_pipeline_validation_error() {
        let body = json!({ "age": 30 });
        let err = run_pipeline(&context(), &body).unwrap_err();
        assert!(matches!(err, ServerError::Validation(_)));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Validated.to_string(), "validated");
    }
}
