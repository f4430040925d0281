use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};

use laundrydesk_auth::Permission;

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

/// Store a proof-of-return image; the returned reference goes into a return record.
pub async fn upload_image(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LOGBOOK_WRITE) {
        return resp;
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    match services.upload_image(content_type, body.to_vec()) {
        Ok(url) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "imageUrl": url })),
        )
            .into_response(),
        Err(e) => errors::image_error_to_response(e),
    }
}

/// Serve a stored image back with its original content type.
pub async fn get_image(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LOGBOOK_READ) {
        return resp;
    }

    match services.get_image(&id) {
        Some(image) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, image.content_type)],
            image.bytes,
        )
            .into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "image not found"),
    }
}
