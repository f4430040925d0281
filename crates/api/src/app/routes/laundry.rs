use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use laundrydesk_auth::Permission;
use laundrydesk_core::OrderId;
use laundrydesk_laundry::{OrderFilter, OrderStatus};

use crate::app::{dto, errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(place_order))
        .route("/orders/:id", get(get_order).delete(delete_order))
        .route("/orders/:id/status", post(update_status))
        .route("/stats", get(order_stats))
        .route("/services", get(list_services))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(q): Query<dto::OrderQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LAUNDRY_READ) {
        return resp;
    }
    let filter = match OrderFilter::from_query(
        q.search.as_deref(),
        q.status.as_deref(),
        q.priority.as_deref(),
    ) {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let body: Vec<_> = services
        .list_orders(&filter)
        .iter()
        .map(dto::order_to_json)
        .collect();
    (StatusCode::OK, Json(serde_json::json!(body))).into_response()
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LAUNDRY_READ) {
        return resp;
    }
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.get_order(id) {
        Some(o) => (StatusCode::OK, Json(dto::order_to_json(&o))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
    }
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LAUNDRY_WRITE) {
        return resp;
    }

    let (details, lines) = body.into_parts();
    match services.place_order(details, lines, principal.user_id()) {
        Ok(o) => (StatusCode::CREATED, Json(dto::order_to_json(&o))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateOrderStatusRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LAUNDRY_WRITE) {
        return resp;
    }
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let status: OrderStatus = match body.status.parse() {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.update_order_status(id, status) {
        Ok(o) => (StatusCode::OK, Json(dto::order_to_json(&o))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LAUNDRY_DELETE) {
        return resp;
    }
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.delete_order(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn order_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LAUNDRY_READ) {
        return resp;
    }

    (StatusCode::OK, Json(services.order_stats())).into_response()
}

pub async fn list_services(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::LAUNDRY_READ) {
        return resp;
    }

    (StatusCode::OK, Json(services.list_laundry_services())).into_response()
}
