use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use laundrydesk_auth::Role;
use laundrydesk_core::UserId;

use crate::app::errors::json_error;
use crate::context::PrincipalContext;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Resolve the acting user from the headers set by the upstream session layer.
///
/// Missing or malformed headers are rejected with 401.
pub async fn principal_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let principal = match extract_principal(req.headers()) {
        Ok(p) => p,
        Err(msg) => return json_error(StatusCode::UNAUTHORIZED, "unauthenticated", msg),
    };

    tracing::debug!(
        user_id = principal.user_id().get(),
        role = principal.role().as_str(),
        path = %req.uri().path(),
        "request principal resolved"
    );

    req.extensions_mut().insert(principal);
    next.run(req).await
}

fn extract_principal(headers: &HeaderMap) -> Result<PrincipalContext, &'static str> {
    let user_id = header_str(headers, USER_ID_HEADER)
        .ok_or("missing x-user-id header")?
        .parse::<UserId>()
        .map_err(|_| "x-user-id must be a positive integer")?;
    if user_id.get() == 0 {
        return Err("x-user-id must be a positive integer");
    }

    let role = header_str(headers, USER_ROLE_HEADER).ok_or("missing x-user-role header")?;

    Ok(PrincipalContext::new(user_id, Role::new(role.to_ascii_lowercase())))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
