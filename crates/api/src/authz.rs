//! API-side authorization guard.
//!
//! Every handler checks its permission here before touching services, keeping
//! domain crates and infra auth-agnostic.

use axum::http::StatusCode;
use axum::response::Response;

use laundrydesk_auth::{Permission, authorize};

use crate::app::errors::json_error;
use crate::context::PrincipalContext;

/// Check `permission` for the current principal; a denial is a ready 403 response.
pub fn require(principal: &PrincipalContext, permission: &'static str) -> Result<(), Response> {
    authorize(&principal.principal(), &Permission::new(permission)).map_err(|e| {
        tracing::info!(
            user_id = principal.user_id().get(),
            role = principal.role().as_str(),
            permission,
            "request forbidden"
        );
        json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}
