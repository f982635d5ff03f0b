use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use shared::{FEATURE_COUNT, FEATURE_NAMES, FeatureRecord, ModelSummary};

use super::artifact::ModelArtifact;
use super::regressors::Regressor;

#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error(
        "Model file {} not found. Please ensure the file is in the correct directory.",
        path.display()
    )]
    ArtifactMissing { path: PathBuf },
    #[error("Model file {} could not be loaded: {reason}", path.display())]
    ArtifactInvalid { path: PathBuf, reason: String },
    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}

/// Loaded price model. Immutable after [`Predictor::load`].
pub struct Predictor {
    model: Box<dyn Regressor>,
}

impl Predictor {
    pub fn load(path: &Path) -> Result<Self, PredictorError> {
        if !path.is_file() {
            return Err(PredictorError::ArtifactMissing {
                path: path.to_path_buf(),
            });
        }

        let invalid = |reason: String| PredictorError::ArtifactInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let raw = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;
        let model = artifact.into_regressor().map_err(invalid)?;

        let predictor = Self::from_regressor(model);
        if let Err(e) = predictor.check_schema() {
            log::warn!("Loaded model will reject every request: {}", e);
        }
        Ok(predictor)
    }

    pub fn from_regressor(model: Box<dyn Regressor>) -> Self {
        Self { model }
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            kind: self.model.kind().to_string(),
            n_features: self.model.feature_names().len(),
        }
    }

    /// The model's columns must be exactly [`FEATURE_NAMES`], in order.
    fn check_schema(&self) -> Result<(), PredictorError> {
        let expected = self.model.feature_names();

        let missing = expected
            .iter()
            .find(|name| !FEATURE_NAMES.contains(&name.as_str()));
        if let Some(missing) = missing {
            return Err(PredictorError::SchemaMismatch(format!(
                "model expects feature {} which the record does not provide",
                missing
            )));
        }
        let extra = FEATURE_NAMES
            .iter()
            .find(|name| !expected.iter().any(|e| e == *name));
        if let Some(extra) = extra {
            return Err(PredictorError::SchemaMismatch(format!(
                "record provides feature {} which the model was not fitted on",
                extra
            )));
        }
        if expected.len() != FEATURE_COUNT {
            return Err(PredictorError::SchemaMismatch(format!(
                "model expects {} features, record has {}",
                expected.len(),
                FEATURE_COUNT
            )));
        }
        if let Some((i, (want, got))) = expected
            .iter()
            .zip(FEATURE_NAMES)
            .enumerate()
            .find(|(_, (want, got))| want.as_str() != *got)
        {
            return Err(PredictorError::SchemaMismatch(format!(
                "column {} is {} but the model expects {}",
                i, got, want
            )));
        }
        Ok(())
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictorError> {
        self.check_schema()?;

        let batch = Array2::from_shape_vec((1, FEATURE_COUNT), record.values().to_vec())
            .map_err(|e| PredictorError::InferenceFailed(e.to_string()))?;
        let output = self.model.predict(batch.view());

        let price = output
            .first()
            .copied()
            .ok_or_else(|| PredictorError::InferenceFailed("model returned no prediction".into()))?;
        if !price.is_finite() {
            return Err(PredictorError::InferenceFailed(format!(
                "model returned {}",
                price
            )));
        }
        Ok(price)
    }
}
