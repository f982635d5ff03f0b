use shared::{FeatureRecord, FieldId, FormState, PredictionResponse, StatusResponse};
use std::collections::HashMap;

/// Whether the model behind the page loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Startup {
    Checking,
    Ready,
    Failed(String),
}

/// Everything the page shows, kept apart from the component so the
/// transitions run without a browser.
pub struct PageState {
    pub startup: Startup,
    pub form: FormState,
    pub field_errors: HashMap<FieldId, String>,
    pub result: Option<PredictionResponse>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            startup: Startup::Checking,
            form: FormState::default(),
            field_errors: HashMap::new(),
            result: None,
            loading: false,
            error: None,
        }
    }
}

impl PageState {
    pub fn apply_status(&mut self, status: Result<StatusResponse, String>) {
        self.startup = match status {
            Ok(status) if status.ready => {
                if let Some(summary) = &status.model {
                    log::info!("Model ready: {} ({} features)", summary.kind, summary.n_features);
                }
                Startup::Ready
            }
            Ok(status) => {
                let message = status
                    .error
                    .unwrap_or_else(|| "The price model is unavailable.".to_string());
                log::error!("{}", message);
                Startup::Failed(message)
            }
            Err(e) => {
                log::error!("Status check failed: {}", e);
                Startup::Failed(e)
            }
        };
    }

    pub fn is_ready(&self) -> bool {
        self.startup == Startup::Ready
    }

    // A shown price always belongs to the current inputs, so any edit drops it.
    pub fn set_field(&mut self, id: FieldId, raw: &str) {
        match self.form.set(id, raw) {
            Ok(()) => {
                self.field_errors.remove(&id);
                self.result = None;
            }
            Err(e) => {
                log::warn!("Rejected input for {}: {}", id.column(), e);
                self.field_errors.insert(id, e.to_string());
            }
        }
    }

    pub fn step_field(&mut self, id: FieldId, up: bool) {
        if up {
            self.form.step_up(id);
        } else {
            self.form.step_down(id);
        }
        self.field_errors.remove(&id);
        self.result = None;
    }

    pub fn reset(&mut self) {
        self.form.reset();
        self.field_errors.clear();
        self.result = None;
        self.error = None;
    }

    /// Record to send, or `None` while the model is not ready.
    pub fn begin_prediction(&mut self) -> Option<FeatureRecord> {
        if !self.is_ready() {
            return None;
        }
        self.loading = true;
        self.error = None;
        self.result = None;
        Some(self.form.collect())
    }

    pub fn finish_prediction(&mut self, response: PredictionResponse) {
        log::info!("Prediction {} received", response.request_id);
        self.result = Some(response);
        self.loading = false;
    }

    pub fn fail(&mut self, error: Option<String>) {
        self.error = error;
        self.result = None;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ModelSummary;

    fn ready_page() -> PageState {
        let mut page = PageState::default();
        page.apply_status(Ok(StatusResponse::ready(ModelSummary {
            kind: "constant".to_string(),
            n_features: 22,
        })));
        page
    }

    fn response(price: f64) -> PredictionResponse {
        PredictionResponse {
            request_id: "req-1".to_string(),
            price,
            display: shared::prediction_display(price),
        }
    }

    #[test]
    fn not_ready_status_blocks_the_form() {
        let mut page = PageState::default();
        page.apply_status(Ok(StatusResponse::failed(
            "Model file models/model.json not found.".to_string(),
        )));
        assert_eq!(
            page.startup,
            Startup::Failed("Model file models/model.json not found.".to_string())
        );
        assert!(page.begin_prediction().is_none());
        assert!(!page.loading);
    }

    #[test]
    fn unreachable_backend_blocks_the_form() {
        let mut page = PageState::default();
        page.apply_status(Err("Request error: connection refused".to_string()));
        assert!(matches!(page.startup, Startup::Failed(ref m) if m.contains("refused")));
        assert!(page.begin_prediction().is_none());
    }

    #[test]
    fn predictions_wait_for_the_status_check() {
        let mut page = PageState::default();
        assert_eq!(page.startup, Startup::Checking);
        assert!(page.begin_prediction().is_none());
    }

    #[test]
    fn ready_page_sends_the_collected_record() {
        let mut page = ready_page();
        page.set_field(FieldId::LivingArea, "2200");

        let record = page.begin_prediction().unwrap();
        assert!(page.loading);
        assert_eq!(record.get(FieldId::LivingArea).as_f64(), 2200.0);
    }

    #[test]
    fn failed_request_hides_previous_price() {
        let mut page = ready_page();
        page.begin_prediction().unwrap();
        page.finish_prediction(response(250000.0));
        assert!(page.result.is_some());

        page.begin_prediction().unwrap();
        assert!(page.result.is_none());
        page.fail(Some("Server error 503".to_string()));
        assert!(page.result.is_none());
        assert!(!page.loading);
        assert_eq!(page.error.as_deref(), Some("Server error 503"));
    }

    #[test]
    fn edits_hide_previous_price() {
        let mut page = ready_page();
        page.finish_prediction(response(250000.0));
        page.set_field(FieldId::Latitude, "34.05");
        assert!(page.result.is_none());

        page.finish_prediction(response(250000.0));
        page.step_field(FieldId::BedroomsTotal, true);
        assert!(page.result.is_none());
    }

    #[test]
    fn rejected_input_keeps_price_and_reports_field() {
        let mut page = ready_page();
        page.finish_prediction(response(250000.0));
        page.set_field(FieldId::BedroomsTotal, "2.5");
        assert!(page.result.is_some());
        assert!(page.field_errors.contains_key(&FieldId::BedroomsTotal));
    }
}
