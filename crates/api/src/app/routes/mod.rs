use axum::{Router, routing::{get, post}};

pub mod categories;
pub mod invoices;
pub mod items;
pub mod laundry;
pub mod logbook;
pub mod system;
pub mod uploads;

/// Router for all endpoints that need an acting user.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/uploads", post(uploads::upload_image))
        .route("/uploads/:id", get(uploads::get_image))
        .nest("/categories", categories::router())
        .nest("/items", items::router())
        .nest("/logbook", logbook::router())
        .nest("/invoices", invoices::router())
        .nest("/laundry", laundry::router())
}
