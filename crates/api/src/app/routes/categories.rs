use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use laundrydesk_auth::Permission;
use laundrydesk_core::CategoryId;

use crate::app::{dto, errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/export.csv", get(export_categories))
        .route("/import", post(import_categories))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(q): Query<dto::SearchQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::CATEGORIES_READ) {
        return resp;
    }

    let categories = services.list_categories(q.search.as_deref());
    let body: Vec<_> = categories
        .iter()
        .map(|c| dto::category_to_json(c, services.category_item_count(c)))
        .collect();

    (StatusCode::OK, Json(serde_json::json!(body))).into_response()
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::CATEGORIES_READ) {
        return resp;
    }
    let id: CategoryId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.get_category(id) {
        Some(c) => (
            StatusCode::OK,
            Json(dto::category_to_json(&c, services.category_item_count(&c))),
        )
            .into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "category not found"),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CategoryRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::CATEGORIES_WRITE) {
        return resp;
    }

    let (input, status) = body.into_parts();
    if status.is_some() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "status cannot be set on create; new categories start active",
        );
    }
    match services.create_category(input) {
        Ok(c) => (StatusCode::CREATED, Json(dto::category_to_json(&c, 0))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CategoryRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::CATEGORIES_WRITE) {
        return resp;
    }
    let id: CategoryId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let (input, status) = body.into_parts();
    match services.update_category(id, input, status) {
        Ok(c) => (
            StatusCode::OK,
            Json(dto::category_to_json(&c, services.category_item_count(&c))),
        )
            .into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::CATEGORIES_WRITE) {
        return resp;
    }
    let id: CategoryId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.delete_category(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn export_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::CATEGORIES_READ) {
        return resp;
    }

    match services.export_categories_csv() {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"categories_data.csv\"".to_string(),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => errors::export_error_to_response(e.into()),
    }
}

/// Bulk import from a CSV request body.
pub async fn import_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Bytes,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::CATEGORIES_WRITE) {
        return resp;
    }

    match services.import_categories(&body) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::import_error_to_response(e),
    }
}
