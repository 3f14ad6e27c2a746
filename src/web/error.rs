//! JSON error responses for the API routes

use crate::utils::error::PredictorError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl PredictorError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictorError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            PredictorError::NotFoundError { .. } | PredictorError::LoadError { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PredictorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("API error: {}", self);
        }

        let body = Json(json!({
            "error": self.user_friendly_message(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
