pub mod api;
pub mod form;
pub mod price;
pub mod record;

pub use api::{ErrorKind, ErrorResponse, ModelSummary, PredictionResponse, StatusResponse};
pub use form::{
    FieldError, FieldId, FieldSpec, FieldValue, FormState, Group, NumberKind, SECTIONS, Section,
};
pub use price::{format_price, prediction_display};
pub use record::{FEATURE_COUNT, FEATURE_NAMES, FeatureRecord, RecordError};
