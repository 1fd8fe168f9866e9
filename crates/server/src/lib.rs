//! Tangerine Server - CRUD over customers, products, orders, and order items.
//!
//! # Architecture
//!
//! - Axum web framework with JSON request/response bodies
//! - `PostgreSQL` behind per-resource store traits (`store`), with an
//!   in-memory backend for tests and local development
//! - Resource services (`services`) orchestrating validate → store per
//!   operation
//! - A single error type (`error`) mapping the domain taxonomy onto HTTP
//!
//! The service is stateless between requests: each operation stands alone,
//! and all consistency comes from the store's per-row atomicity plus the
//! schema's constraints.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the application with its middleware stack.
#[must_use]
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
