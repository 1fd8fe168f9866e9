//! Product CRUD handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use tangerine_core::ProductId;

use crate::error::AppError;
use crate::models::{Product, ProductDraft};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(replace_product).delete(delete_product),
        )
}

/// List all products.
///
/// # Errors
///
/// Returns an error if the store query fails.
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    state.products().list().await.map(Json)
}

/// Get a product by id.
///
/// # Errors
///
/// Returns 404 if no product has the given id.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    state.products().get(id).await.map(Json)
}

/// Create a new product.
///
/// # Errors
///
/// Returns 400 on validation failure.
pub async fn create_product(
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.products().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product by id.
///
/// # Errors
///
/// Returns 404 if absent and 400 on validation failure.
pub async fn replace_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, AppError> {
    state.products().replace(id, &draft).await.map(Json)
}

/// Delete a product by id.
///
/// # Errors
///
/// Returns 404 if absent and 409 if an order item still references the
/// product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    state.products().remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
