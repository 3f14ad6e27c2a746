//! HTTP surface: the prediction form plus a small JSON API.
//!
//! | Route               | Method | Response                         |
//! |---------------------|--------|----------------------------------|
//! | `/`                 | GET    | form page                        |
//! | `/predict`          | POST   | form page with the outcome panel |
//! | `/api/v1/predict`   | POST   | `Prediction` JSON or error JSON  |
//! | `/api/v1/districts` | GET    | district names                   |
//! | `/health`           | GET    | health JSON                      |

pub mod error;
pub mod handlers;

use crate::core::service::PredictionService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

pub fn create_router(service: Arc<PredictionService>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::submit_form))
        .route("/api/v1/predict", post(handlers::api_predict))
        .route("/api/v1/districts", get(handlers::districts))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until the listener fails or the process is interrupted.
pub async fn serve(listener: TcpListener, service: Arc<PredictionService>) -> std::io::Result<()> {
    let app = create_router(service);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
