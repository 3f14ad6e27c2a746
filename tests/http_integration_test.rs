use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use uranium_predictor::core::FeatureRecord;
use uranium_predictor::{PredictionService, Predictor, Result};

struct FixedPredictor(f64);

impl Predictor for FixedPredictor {
    fn predict(&self, _record: &FeatureRecord) -> Result<f64> {
        Ok(self.0)
    }
}

/// Starts the server on an ephemeral port and returns its base URL.
async fn spawn_server(service: PredictionService) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(uranium_predictor::web::serve(listener, Arc::new(service)));
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_form_page() {
    let base = spawn_server(PredictionService::with_predictor(Arc::new(FixedPredictor(5.0)))).await;

    let response = reqwest::get(format!("{}/", base)).await.unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("Punjab Groundwater Uranium Predictor"));
    assert!(body.contains("<option value=\"Ludhiana\">Ludhiana</option>"));
}

#[tokio::test]
async fn test_form_submission_success_and_error() {
    let base = spawn_server(PredictionService::with_predictor(Arc::new(FixedPredictor(5.0)))).await;
    let client = reqwest::Client::new();

    let body = client
        .post(format!("{}/predict", base))
        .form(&[("district", "Ludhiana"), ("latitude", "30.9"), ("longitude", "75.85")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("District:</strong> Ludhiana"));
    assert!(body.contains("5.00 μg/L"));

    let response = client
        .post(format!("{}/predict", base))
        .form(&[("district", "Ludhiana"), ("latitude", "40.0"), ("longitude", "75.85")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Latitude/Longitude out of valid region range."));
    assert!(!body.contains("District:</strong>"));
}

#[tokio::test]
async fn test_json_api() {
    let base = spawn_server(PredictionService::with_predictor(Arc::new(FixedPredictor(3.456)))).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/v1/predict", base))
        .json(&serde_json::json!({"district": "Amritsar", "latitude": 31.63, "longitude": 74.87}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["district"], "Amritsar");
    assert_eq!(json["prediction"], 3.456);
    assert_eq!(json["unit"], "μg/L");

    let response = client
        .post(format!("{}/api/v1/predict", base))
        .json(&serde_json::json!({"district": "Amritsar", "latitude": 26.999999, "longitude": 74.87}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["error"], "Latitude/Longitude out of valid region range.");
    assert_eq!(json["status"], 400);

    for body in [
        serde_json::json!({"district": "Ludhiana", "latitude": "abc", "longitude": 75.85}),
        serde_json::json!({"district": "Ludhiana", "longitude": 75.85}),
    ] {
        let response = client
            .post(format!("{}/api/v1/predict", base))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: Value = response.json().await.unwrap();
        assert_eq!(json["error"], "Latitude and Longitude must be valid numbers.");
        assert_eq!(json["status"], 400);
    }

    let response = client
        .post(format!("{}/api/v1/predict", base))
        .header("content-type", "application/json")
        .body("{\"district\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_model_is_not_fatal() {
    let dir = tempfile::TempDir::new().unwrap();
    let base = spawn_server(PredictionService::new(dir.path().join("model.json"))).await;
    let client = reqwest::Client::new();

    let health: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["model_loaded"], false);
    assert_eq!(health["status"], "degraded");

    let response = client
        .post(format!("{}/api/v1/predict", base))
        .json(&serde_json::json!({"district": "Moga", "latitude": 30.8, "longitude": 75.17}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);

    // 表單仍然可用，錯誤顯示在頁面上
    let body = client
        .post(format!("{}/predict", base))
        .form(&[("district", "Moga"), ("latitude", "30.8"), ("longitude", "75.17")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Model could not be loaded: Model file not found"));
}

#[tokio::test]
async fn test_model_loaded_after_startup() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    let base = spawn_server(PredictionService::new(&path)).await;
    let client = reqwest::Client::new();
    let request = serde_json::json!({"district": "Ludhiana", "latitude": 30.9, "longitude": 75.85});

    let response = client
        .post(format!("{}/api/v1/predict", base))
        .json(&request)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);

    let shipped = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("models/model.json");
    std::fs::copy(shipped, &path).unwrap();

    let response = client
        .post(format!("{}/api/v1/predict", base))
        .json(&request)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let json: Value = response.json().await.unwrap();
    let prediction = json["prediction"].as_f64().unwrap();
    assert!((prediction - 14.1).abs() < 1e-9);

    let health: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["model_loaded"], true);
}

#[tokio::test]
async fn test_districts_and_health() {
    let base = spawn_server(PredictionService::with_predictor(Arc::new(FixedPredictor(1.0)))).await;

    let names: Vec<String> = reqwest::get(format!("{}/api/v1/districts", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(names.len(), 22);
    assert!(names.contains(&"Tarn Taran".to_string()));

    let health: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["model_loaded"], true);
}
