use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use cvjson_core::api_types::HealthResponse;

use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    info!("Health check requested");

    let api_key_configured = match state.config.validate() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Model provider is not configured: {e}");
            false
        }
    };

    let status = if api_key_configured { "ok" } else { "degraded" };

    let response = HealthResponse {
        status: status.to_string(),
        version: VERSION.to_string(),
        model: state.config.extraction_model.clone(),
        api_key_configured,
    };

    (StatusCode::OK, Json(response))
}
