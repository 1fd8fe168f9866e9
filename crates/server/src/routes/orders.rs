//! Order CRUD handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use tangerine_core::OrderId;

use crate::error::AppError;
use crate::models::{Order, OrderDraft};
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order).put(replace_order).delete(delete_order),
        )
}

/// List all orders.
///
/// # Errors
///
/// Returns an error if the store query fails.
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    state.orders().list().await.map(Json)
}

/// Get an order by id.
///
/// # Errors
///
/// Returns 404 if no order has the given id.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AppError> {
    state.orders().get(id).await.map(Json)
}

/// Create a new order.
///
/// # Errors
///
/// Returns 400 on validation failure, including a dangling `customerId`.
pub async fn create_order(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.orders().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Replace an order by id. Whole-record: omitted fields take their
/// defaults, not the stored values.
///
/// # Errors
///
/// Returns 404 if absent and 400 on validation failure.
pub async fn replace_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(draft): Json<OrderDraft>,
) -> Result<Json<Order>, AppError> {
    state.orders().replace(id, &draft).await.map(Json)
}

/// Delete an order by id.
///
/// # Errors
///
/// Returns 404 if absent and 409 if order items still reference the order.
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<StatusCode, AppError> {
    state.orders().remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
