//! Tangerine Server - order-management CRUD service.
//!
//! Serves JSON CRUD endpoints for customers, products, orders, and order
//! items on port 3000 (configurable). Migrations are NOT run on startup;
//! apply them via `tg-cli migrate`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use tangerine_server::config::ServerConfig;
use tangerine_server::store::postgres;
use tangerine_server::{AppState, app};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter; defaults to info level for our
    // crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tangerine_server=info,tower_http=debug".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = postgres::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    let state = AppState::from_postgres(pool);
    let addr = SocketAddr::from((config.host, config.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app(state))
        .await
        .expect("Server error");
}
