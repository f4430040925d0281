use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use laundrydesk_auth::Permission;
use laundrydesk_core::LogEntryId;

use crate::app::{dto, errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_entries).post(add_entry))
        .route("/:id", put(edit_entry).get(get_entry).delete(delete_entry))
        .route("/:id/returns", post(record_return))
}

pub async fn list_entries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LOGBOOK_READ) {
        return resp;
    }

    let body: Vec<_> = services
        .list_log_entries()
        .iter()
        .map(dto::log_entry_to_json)
        .collect();
    (StatusCode::OK, Json(serde_json::json!(body))).into_response()
}

pub async fn get_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LOGBOOK_READ) {
        return resp;
    }
    let id: LogEntryId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.get_log_entry(id) {
        Some(e) => (StatusCode::OK, Json(dto::log_entry_to_json(&e))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "log entry not found"),
    }
}

pub async fn add_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::LogEntryRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LOGBOOK_WRITE) {
        return resp;
    }

    let quantities = body.quantities();
    match services.add_log_entry(body.date, body.item_id, quantities) {
        Ok(e) => (StatusCode::CREATED, Json(dto::log_entry_to_json(&e))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn edit_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::LogEntryRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LOGBOOK_WRITE) {
        return resp;
    }
    let id: LogEntryId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let quantities = body.quantities();
    match services.edit_log_entry(id, body.date, body.item_id, quantities) {
        Ok(e) => (StatusCode::OK, Json(dto::log_entry_to_json(&e))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn delete_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LOGBOOK_WRITE) {
        return resp;
    }
    let id: LogEntryId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.delete_log_entry(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

/// Record items coming back for a pending entry.
pub async fn record_return(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::RecordReturnRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LOGBOOK_WRITE) {
        return resp;
    }
    let id: LogEntryId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.record_return(id, body.quantity, body.image_url) {
        Ok(e) => (StatusCode::OK, Json(dto::log_entry_to_json(&e))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
