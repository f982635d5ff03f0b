pub mod artifact;
pub mod model;
pub mod regressors;

use std::path::Path;
use std::sync::Arc;

pub use model::{Predictor, PredictorError};

/// Outcome of loading the model at startup. Never changes afterwards.
#[derive(Clone)]
pub enum ModelState {
    Ready(Arc<Predictor>),
    Failed(String),
}

impl ModelState {
    pub fn initialize(model_path: &Path) -> Self {
        match Predictor::load(model_path) {
            Ok(predictor) => {
                let summary = predictor.summary();
                log::info!(
                    "Loaded {} model with {} features from {}",
                    summary.kind,
                    summary.n_features,
                    model_path.display()
                );
                ModelState::Ready(Arc::new(predictor))
            }
            Err(e) => {
                log::error!("Failed to load model at startup: {}", e);
                ModelState::Failed(e.to_string())
            }
        }
    }
}
