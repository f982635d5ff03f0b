use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResponse {
    pub request_id: String,
    pub price: f64,
    /// Ready-to-render line, e.g. `Predicted Price: $250,000.00`.
    pub display: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Body was not a JSON document.
    InvalidRequest,
    SchemaMismatch,
    ModelUnavailable,
    InferenceFailed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelSummary {
    pub kind: String,
    pub n_features: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatusResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn ready(model: ModelSummary) -> Self {
        Self {
            ready: true,
            model: Some(model),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ready: false,
            model: None,
            error: Some(error.into()),
        }
    }
}
