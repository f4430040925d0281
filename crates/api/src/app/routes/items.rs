use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use laundrydesk_auth::Permission;
use laundrydesk_catalog::LINEN_CATALOG;

use crate::app::{dto, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items))
        .route("/catalog", get(linen_catalog))
}

/// The priced item table.
pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::CATEGORIES_READ) {
        return resp;
    }

    let body: Vec<_> = services.list_items().iter().map(dto::item_to_json).collect();
    (StatusCode::OK, Json(serde_json::json!(body))).into_response()
}

/// The fixed linen item types selectable in the log book.
pub async fn linen_catalog(
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LOGBOOK_READ) {
        return resp;
    }

    let body: Vec<_> = LINEN_CATALOG
        .iter()
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
        .collect();
    (StatusCode::OK, Json(serde_json::json!(body))).into_response()
}
