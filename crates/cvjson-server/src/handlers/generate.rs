use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, field, instrument, Span};

use cvjson_core::api_types::{ErrorResponse, GenerateJsonRequest};
use cvjson_core::ExtractedText;

use crate::state::AppState;

/// Any failure, including an unreadable body, answers 500 with `{"error": ...}`;
/// existing clients depend on it.
#[instrument(skip_all, fields(template = field::Empty, chars = field::Empty))]
pub async fn generate_json(
    State(state): State<AppState>,
    payload: Result<Json<GenerateJsonRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!(status = %rejection.status(), "Rejected generate-json body: {rejection}");
            return internal_error(rejection.body_text());
        }
    };

    let span = Span::current();
    span.record("template", field::display(request.template));
    span.record("chars", request.text.len());

    let deadline = state.deadline();
    let text = ExtractedText::new(request.text);

    match state
        .pipeline
        .generate(&text, request.template, Some(deadline))
        .await
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => {
            error!(kind = ?e.kind(), "JSON generation failed: {e}");
            internal_error(e.to_string())
        }
    }
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::message(message)),
    )
        .into_response()
}
