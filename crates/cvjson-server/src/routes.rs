use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health
        .route("/api/health", get(handlers::health::health_check))
        // Documents
        .route(
            "/api/process-pdf",
            post(handlers::documents::process_pdf).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/extract",
            post(handlers::documents::extract).fallback(handlers::method_not_allowed),
        )
        // Generation
        .route(
            "/api/generate-json",
            post(handlers::generate::generate_json).fallback(handlers::method_not_allowed),
        )
        // Tokens
        .route(
            "/api/count-tokens",
            post(handlers::tokens::count_tokens).fallback(handlers::method_not_allowed),
        )
        // Templates
        .route("/api/templates", get(handlers::templates::list_templates))
}
