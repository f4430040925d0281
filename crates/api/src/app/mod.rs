//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: in-memory repositories, dispatchers and the operations on them
//! - `routes/`: HTTP routes + handlers (one file per screen)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use laundrydesk_infra::DispatchError;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Result<Router, DispatchError> {
    let services = Arc::new(services::build_services(config.seed_sample_data)?);

    // Protected routes: require an acting user.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::principal_middleware));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new()))
}
