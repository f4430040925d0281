//! HTTP API: configuration, request context, and the axum application.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
