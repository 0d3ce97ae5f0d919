use axum::{http::StatusCode, response::IntoResponse, Json};

use cvjson_core::api_types::{TemplateInfo, TemplateListResponse};
use cvjson_core::template;

pub async fn list_templates() -> impl IntoResponse {
    let templates = template::templates()
        .iter()
        .map(|spec| TemplateInfo {
            id: spec.id,
            name: spec.name.to_string(),
        })
        .collect();

    (StatusCode::OK, Json(TemplateListResponse { templates }))
}
