use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use laundrydesk_auth::permissions_for_roles;

use crate::context::PrincipalContext;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// The acting user and what the role policy lets them do.
pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    let permissions: Vec<String> = permissions_for_roles(std::slice::from_ref(principal.role()))
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "userId": principal.user_id(),
            "role": principal.role().as_str(),
            "permissions": permissions,
        })),
    )
}
