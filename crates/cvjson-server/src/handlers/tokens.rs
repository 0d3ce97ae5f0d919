use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{error, info, instrument};

use cvjson_core::api_types::{CountTokensRequest, CountTokensResponse, ErrorResponse};

use crate::state::AppState;

#[instrument(skip_all, fields(model = ?request.model))]
pub async fn count_tokens(
    State(state): State<AppState>,
    Json(request): Json<CountTokensRequest>,
) -> impl IntoResponse {
    let model = request
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.config.extraction_model.clone());

    // Loading a BPE table on first use is CPU-heavy.
    let tokens = state.tokens.clone();
    let counted_model = model.clone();
    let result =
        tokio::task::spawn_blocking(move || tokens.count(&request.text, &counted_model)).await;

    match result {
        Ok(Ok(tokens)) => {
            info!(model = %model, tokens, "Counted tokens");
            (StatusCode::OK, Json(CountTokensResponse { model, tokens })).into_response()
        }
        Ok(Err(e)) => {
            tracing::warn!(model = %model, "Token counting rejected: {e}");
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&e))).into_response()
        }
        Err(e) => {
            error!("Token counting task failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::message(format!("Token counting failed: {e}"))),
            )
                .into_response()
        }
    }
}
