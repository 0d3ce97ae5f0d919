use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{error, info, instrument};

use cvjson_core::api_types::{ErrorResponse, ExtractRequest, ProcessPdfRequest, ProcessPdfResponse};
use cvjson_core::Document;

use crate::handlers::status_for;
use crate::state::AppState;

const UPLOAD_NAME: &str = "upload.pdf";

/// Text only; the caller sends the text to `/api/generate-json` afterwards.
#[instrument(skip_all)]
pub async fn process_pdf(
    State(state): State<AppState>,
    Json(request): Json<ProcessPdfRequest>,
) -> impl IntoResponse {
    let result = match Document::from_data_url(&request.file_content, UPLOAD_NAME) {
        Ok(document) => state.text_extractor.extract_text(&document).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(text) => {
            info!(chars = text.len(), "Extracted text from upload");
            let response = ProcessPdfResponse {
                text: text.into_inner(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(kind = ?e.kind(), "PDF processing failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::message(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Upload in, record out, in one request.
#[instrument(skip_all, fields(file_name = %request.file_name, template = %request.template))]
pub async fn extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> impl IntoResponse {
    let deadline = state.deadline();
    let result = match Document::from_data_url(&request.file_content, request.file_name.as_str())
    {
        Ok(document) => {
            state
                .pipeline
                .extract(&document, request.template, Some(deadline))
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => {
            error!(kind = ?e.kind(), "Extraction failed: {e}");
            (status_for(e.kind()), Json(ErrorResponse::from(&e))).into_response()
        }
    }
}
