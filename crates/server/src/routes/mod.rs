//! HTTP route handlers.
//!
//! Thin dispatch from requests to the resource services: extract, call,
//! serialize. Each resource module wires the same five routes — list, get,
//! create (201), replace, delete (204) — and every failure path surfaces as
//! an [`crate::error::AppError`] response.

pub mod customers;
pub mod order_items;
pub mod orders;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(customers::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(order_items::router())
}

async fn health() -> &'static str {
    "OK"
}
