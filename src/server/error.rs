//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::{ChargesError, EncodingError, InferenceError, ValidationError};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ChargesError> for ServerError {
    fn from(err: ChargesError) -> Self {
        match err {
            ChargesError::Validation(e) => ServerError::Validation(e),
            ChargesError::Encoding(e) => ServerError::Encoding(e),
            ChargesError::Inference(e) => ServerError::Inference(e),
            ChargesError::Startup(e) => ServerError::Internal(e.to_string()),
        }
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ServerError::Validation(e) => e.to_string(),
            ServerError::Encoding(e) => {
                tracing::error!(
                    field = %e.field,
                    value = %e.value,
                    "Validated value missing from vocabulary; validator and encoder disagree"
                );
                "Feature encoding failed".to_string()
            }
            ServerError::Inference(e) => {
                tracing::error!(detail = %e, "Inference error");
                "Prediction failed".to_string()
            }
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                "An internal error occurred".to_string()
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
