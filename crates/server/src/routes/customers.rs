//! Customer CRUD handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use tangerine_core::CustomerId;

use crate::error::AppError;
use crate::models::{Customer, CustomerDraft};
use crate::state::AppState;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(replace_customer).delete(delete_customer),
        )
}

/// List all customers.
///
/// # Errors
///
/// Returns an error if the store query fails.
pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    state.customers().list().await.map(Json)
}

/// Get a customer by id.
///
/// # Errors
///
/// Returns 404 if no customer has the given id.
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>, AppError> {
    state.customers().get(id).await.map(Json)
}

/// Create a new customer.
///
/// # Errors
///
/// Returns 400 on validation failure and 409 on a duplicate email.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(draft): Json<CustomerDraft>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = state.customers().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Replace a customer by id.
///
/// # Errors
///
/// Returns 404 if absent and 400 on validation failure.
pub async fn replace_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(draft): Json<CustomerDraft>,
) -> Result<Json<Customer>, AppError> {
    state.customers().replace(id, &draft).await.map(Json)
}

/// Delete a customer by id.
///
/// # Errors
///
/// Returns 404 if absent and 409 if an order still references the customer.
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<StatusCode, AppError> {
    state.customers().remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
