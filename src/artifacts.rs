//! Artifact store
//!
//! Everything a request needs is loaded once into an [`InferenceContext`] at
//! startup. The context is immutable afterwards and shared across handlers
//! behind an `Arc`, so no locking is needed.

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::error::{ChargesError, StartupError};
use crate::inference::{PredictionResult, Predictor};
use crate::models::{ModelArtifact, Regressor, Tree};
use crate::preprocessing::{CategoricalField, Encoder, FeaturePipeline, Scaler, Vocabulary};
use crate::validation::{self, PredictionRequest};

/// Read and deserialize a JSON artifact
pub(crate) fn read_json_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, StartupError> {
    let file = File::open(path).map_err(|source| StartupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| StartupError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Locations of the persisted artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            scaler: scaler.into(),
        }
    }
}

/// Immutable bundle of model, scaler and vocabularies
#[derive(Debug)]
pub struct InferenceContext {
    model: Arc<dyn Regressor>,
    scaler: Scaler,
    encoder: Encoder,
}

impl InferenceContext {
    /// Load all artifacts from disk. Any failure here is fatal to startup.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, StartupError> {
        let model = ModelArtifact::load(&paths.model)?;
        let scaler = Scaler::load(&paths.scaler)?;

        let trees = model.trees();
        info!(
            model_path = %paths.model.display(),
            scaler_path = %paths.scaler.display(),
            model_kind = model.kind(),
            n_trees = trees.len(),
            n_leaves = trees.iter().map(Tree::n_leaves).sum::<usize>(),
            max_depth = trees.iter().map(Tree::depth).max().unwrap_or(0),
            n_features = model.n_features(),
            "Artifacts loaded"
        );

        Self::from_parts(Arc::new(model), scaler)
    }

    /// Build a context from in-memory artifacts
    pub fn from_parts(model: Arc<dyn Regressor>, scaler: Scaler) -> Result<Self, StartupError> {
        if model.n_features() != scaler.n_features() {
            return Err(StartupError::invalid(
                "model",
                format!(
                    "model expects {} features but scaler has {} columns",
                    model.n_features(),
                    scaler.n_features()
                ),
            ));
        }

        Ok(Self {
            model,
            scaler,
            encoder: Encoder::new(),
        })
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn vocabulary(&self, field: CategoricalField) -> &'static Vocabulary {
        self.encoder.vocabulary(field)
    }

    pub fn pipeline(&self) -> FeaturePipeline<'_> {
        FeaturePipeline::new(&self.encoder, &self.scaler)
    }

    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(self.model.as_ref())
    }

    /// Encode, scale and predict an already validated request
    pub fn predict_request(
        &self,
        req: &PredictionRequest,
    ) -> Result<PredictionResult, ChargesError> {
        let features = self.pipeline().build_features(req)?;
        Ok(self.predictor().predict(&features)?)
    }

    /// Validate a raw JSON body, then predict
    pub fn predict_json(&self, raw: &serde_json::Value) -> Result<PredictionResult, ChargesError> {
        let req = validation::validate(raw)?;
        self.predict_request(&req)
    }
}
