use crate::core::formatter::render_page;
use crate::domain::model::{
    District, Outcome, Prediction, PredictionRequest, NON_NUMERIC_MESSAGE,
};
use crate::utils::error::{PredictorError, Result};
use crate::web::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};

pub async fn index() -> Html<String> {
    Html(render_page(&PredictionRequest::default(), None))
}

/// Form submission. Always answers with the page; errors go in the error panel.
///
/// Submissions run on the blocking pool: the first one after a failed load
/// reads the model file.
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<PredictionRequest>,
) -> Html<String> {
    let service = state.service.clone();
    let request = form.clone();
    let outcome = tokio::task::spawn_blocking(move || service.handle(&request))
        .await
        .unwrap_or_else(|e| {
            Outcome::Failure(PredictorError::prediction(e.to_string()).user_friendly_message())
        });
    Html(render_page(&form, Some(&outcome)))
}

#[derive(Debug, Deserialize)]
pub struct ApiPredictRequest {
    #[serde(default)]
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn api_predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ApiPredictRequest>, JsonRejection>,
) -> Result<Json<Prediction>> {
    let Json(req) = payload.map_err(reject_payload)?;
    let service = state.service.clone();
    let prediction = tokio::task::spawn_blocking(move || {
        service.submit_values(&req.district, req.latitude, req.longitude)
    })
    .await
    .map_err(|e| PredictorError::prediction(e.to_string()))??;
    Ok(Json(prediction))
}

/// district 有預設值，所以資料錯誤只會來自經緯度
fn reject_payload(rejection: JsonRejection) -> PredictorError {
    match rejection {
        JsonRejection::JsonDataError(_) => PredictorError::validation(NON_NUMERIC_MESSAGE),
        other => PredictorError::validation(other.body_text()),
    }
}

pub async fn districts() -> Json<Vec<&'static str>> {
    Json(District::ALL.iter().map(|d| d.name()).collect())
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model_loaded: bool,
    timestamp: i64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.service.is_model_loaded();
    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        model_loaded,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
