pub mod documents;
pub mod generate;
pub mod health;
pub mod templates;
pub mod tokens;

use axum::{http::StatusCode, response::IntoResponse, Json};

use cvjson_core::api_types::ErrorResponse;
use cvjson_core::ErrorKind;

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::message("Method not allowed")),
    )
}

/// Status code for a failed full-pipeline request.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorKind::TextExtractionFailed | ErrorKind::UnexpectedShape => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorKind::ModelInvocationFailed | ErrorKind::MalformedJson => StatusCode::BAD_GATEWAY,
        ErrorKind::UnsupportedModel => StatusCode::BAD_REQUEST,
        ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
