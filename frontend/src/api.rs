use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{ErrorResponse, FeatureRecord, PredictionResponse, StatusResponse};

pub async fn fetch_status() -> Result<StatusResponse, String> {
    let response = Request::get("/api/status")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read_json(response).await
}

pub async fn request_prediction(record: &FeatureRecord) -> Result<PredictionResponse, String> {
    let request = Request::post("/api/predict")
        .json(record)
        .map_err(|e| format!("Failed to build request: {}", e))?;
    let response = request
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if response.ok() {
        return response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e));
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => Err(err.error),
        Err(_) => Err(format!("Server error: {} - {}", status, body)),
    }
}
