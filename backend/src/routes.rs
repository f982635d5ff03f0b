use actix_files::Files;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use log::{error, info, warn};
use shared::{
    ErrorKind, ErrorResponse, FeatureRecord, PredictionResponse, StatusResponse,
    prediction_display,
};
use std::path::PathBuf;
use uuid::Uuid;

use crate::predictor::{ModelState, PredictorError};

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(web::resource("/api/status").route(web::get().to(status)))
        .service(web::resource("/api/predict").route(web::post().to(predict)));
}

fn error_response(status: StatusCode, kind: ErrorKind, error: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse { error, kind })
}

// Unparseable bodies and wrong content types still answer with an ErrorResponse.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body: {}", err);
    let response = error_response(
        StatusCode::BAD_REQUEST,
        ErrorKind::InvalidRequest,
        format!("Invalid request body: {}", err),
    );
    InternalError::from_response(err, response).into()
}

impl PredictorError {
    fn to_response(&self) -> HttpResponse {
        match self {
            PredictorError::SchemaMismatch(_) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::SchemaMismatch,
                self.to_string(),
            ),
            PredictorError::ArtifactMissing { .. } | PredictorError::ArtifactInvalid { .. } => {
                error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorKind::ModelUnavailable,
                    self.to_string(),
                )
            }
            PredictorError::InferenceFailed(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::InferenceFailed,
                self.to_string(),
            ),
        }
    }
}

async fn status(state: web::Data<ModelState>) -> HttpResponse {
    match state.get_ref() {
        ModelState::Ready(predictor) => {
            HttpResponse::Ok().json(StatusResponse::ready(predictor.summary()))
        }
        ModelState::Failed(message) => {
            HttpResponse::Ok().json(StatusResponse::failed(message.clone()))
        }
    }
}

async fn predict(
    state: web::Data<ModelState>,
    payload: web::Json<serde_json::Value>,
) -> HttpResponse {
    let predictor = match state.get_ref() {
        ModelState::Ready(predictor) => predictor,
        ModelState::Failed(message) => {
            warn!("Prediction requested but no model is loaded");
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::ModelUnavailable,
                message.clone(),
            );
        }
    };

    let record = match FeatureRecord::from_json(payload.into_inner()) {
        Ok(record) => record,
        Err(e) => {
            warn!("Rejected feature record: {}", e);
            return error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::SchemaMismatch,
                format!("Feature schema mismatch: {}", e),
            );
        }
    };

    let request_id = Uuid::new_v4();
    match predictor.predict(&record) {
        Ok(price) => {
            info!("Prediction {}: {:.2}", request_id, price);
            HttpResponse::Ok().json(PredictionResponse {
                request_id: request_id.to_string(),
                price,
                display: prediction_display(price),
            })
        }
        Err(e) => {
            error!("Prediction {} failed: {}", request_id, e);
            e.to_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::Predictor;
    use actix_web::http::header::ContentType;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use shared::{FEATURE_NAMES, FieldId, FormState};
    use std::sync::Arc;

    fn load_state(artifact: Value) -> (tempfile::TempDir, ModelState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, artifact.to_string()).unwrap();
        let state = ModelState::Ready(Arc::new(Predictor::load(&path).unwrap()));
        (dir, state)
    }

    fn constant_model(value: f64) -> Value {
        json!({ "kind": "constant", "feature_names": FEATURE_NAMES, "value": value })
    }

    macro_rules! api {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(configure_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn default_form_displays_predicted_price() {
        let (_dir, state) = load_state(constant_model(250000.0));
        let app = api!(state);

        let record = FormState::default().collect();
        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(record)
            .to_request();
        let resp: PredictionResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.price, 250000.0);
        assert_eq!(resp.display, "Predicted Price: $250,000.00");
        assert!(Uuid::parse_str(&resp.request_id).is_ok());
    }

    #[actix_web::test]
    async fn overridden_fields_reach_the_model() {
        let mut coefficients = vec![0.0; FEATURE_NAMES.len()];
        coefficients[FieldId::LivingArea.index()] = 100.0;
        let (_dir, state) = load_state(json!({
            "kind": "linear",
            "feature_names": FEATURE_NAMES,
            "coefficients": coefficients,
            "intercept": 0.0
        }));
        let app = api!(state);

        let mut form = FormState::default();
        form.set(FieldId::Latitude, "34.05").unwrap();
        form.set(FieldId::Longitude, "-118.25").unwrap();
        form.set(FieldId::LivingArea, "2200").unwrap();

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(form.collect())
            .to_request();
        let resp: PredictionResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.display, "Predicted Price: $220,000.00");
    }

    #[actix_web::test]
    async fn missing_key_is_unprocessable() {
        let (_dir, state) = load_state(constant_model(1.0));
        let app = api!(state);

        let mut payload = serde_json::to_value(FeatureRecord::default()).unwrap();
        payload.as_object_mut().unwrap().remove("Structure_YearBuilt");

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.kind, ErrorKind::SchemaMismatch);
        assert!(body.error.contains("Structure_YearBuilt"));
    }

    #[actix_web::test]
    async fn truncated_body_gets_json_error() {
        let (_dir, state) = load_state(constant_model(1.0));
        let app = api!(state);

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .insert_header(ContentType::json())
            .set_payload(r#"{"Structure_LivingArea": "#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.kind, ErrorKind::InvalidRequest);
        assert!(body.error.starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn wrong_content_type_gets_json_error() {
        let (_dir, state) = load_state(constant_model(1.0));
        let app = api!(state);

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .insert_header(ContentType::plaintext())
            .set_payload("{}")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.kind, ErrorKind::InvalidRequest);
    }

    #[actix_web::test]
    async fn model_schema_disagreement_is_unprocessable() {
        let (_dir, state) = load_state(json!({
            "kind": "constant",
            "feature_names": ["Structure_LivingArea"],
            "value": 1.0
        }));
        let app = api!(state);

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(FeatureRecord::default())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn failed_startup_blocks_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let state = ModelState::initialize(&dir.path().join("models/model.json"));
        let app = api!(state);

        let req = test::TestRequest::get().uri("/api/status").to_request();
        let status: StatusResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!status.ready);
        assert!(status.error.unwrap().contains("not found"));

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(FeatureRecord::default())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.kind, ErrorKind::ModelUnavailable);
    }

    #[actix_web::test]
    async fn status_reports_loaded_model() {
        let (_dir, state) = load_state(constant_model(1.0));
        let app = api!(state);

        let req = test::TestRequest::get().uri("/api/status").to_request();
        let status: StatusResponse = test::call_and_read_body_json(&app, req).await;
        assert!(status.ready);
        assert_eq!(status.model.unwrap().kind, "constant");
    }
}
