//! Order item CRUD handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use tangerine_core::OrderItemId;

use crate::error::AppError;
use crate::models::{OrderItem, OrderItemDraft};
use crate::state::AppState;

/// Build the order items router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order-items", get(list_order_items).post(create_order_item))
        .route(
            "/order-items/{id}",
            get(get_order_item)
                .put(replace_order_item)
                .delete(delete_order_item),
        )
}

/// List all order items.
///
/// # Errors
///
/// Returns an error if the store query fails.
pub async fn list_order_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderItem>>, AppError> {
    state.order_items().list().await.map(Json)
}

/// Get an order item by id.
///
/// # Errors
///
/// Returns 404 if no order item has the given id.
pub async fn get_order_item(
    State(state): State<AppState>,
    Path(id): Path<OrderItemId>,
) -> Result<Json<OrderItem>, AppError> {
    state.order_items().get(id).await.map(Json)
}

/// Create a new order item.
///
/// # Errors
///
/// Returns 400 on validation failure, including a dangling `orderId` or
/// `productId`.
pub async fn create_order_item(
    State(state): State<AppState>,
    Json(draft): Json<OrderItemDraft>,
) -> Result<(StatusCode, Json<OrderItem>), AppError> {
    let item = state.order_items().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Replace an order item by id.
///
/// # Errors
///
/// Returns 404 if absent and 400 on validation failure.
pub async fn replace_order_item(
    State(state): State<AppState>,
    Path(id): Path<OrderItemId>,
    Json(draft): Json<OrderItemDraft>,
) -> Result<Json<OrderItem>, AppError> {
    state.order_items().replace(id, &draft).await.map(Json)
}

/// Delete an order item by id.
///
/// # Errors
///
/// Returns 404 if absent.
pub async fn delete_order_item(
    State(state): State<AppState>,
    Path(id): Path<OrderItemId>,
) -> Result<StatusCode, AppError> {
    state.order_items().remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
