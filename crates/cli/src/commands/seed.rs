//! Database seeding command.
//!
//! Inserts a small demo dataset through the server's Postgres stores: two
//! customers, two products, and one order with line items. Re-running
//! against an already seeded database fails on the unique customer email.

use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::SecretString;

use tangerine_core::{Email, EmailError, OrderStatus};
use tangerine_server::models::{NewCustomer, NewOrder, NewOrderItem, NewProduct};
use tangerine_server::store::postgres::{self, PgStore};
use tangerine_server::store::{
    CustomerStore, OrderItemStore, OrderStore, ProductStore, StoreError,
};

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid seed email: {0}")]
    Email(#[from] EmailError),
}

/// Insert the demo dataset.
///
/// # Errors
///
/// Returns `SeedError` if `DATABASE_URL` is unset or any insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = std::env::var("DATABASE_URL")
        .map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?
        .into();

    let pool = postgres::create_pool(&database_url).await?;
    let store = PgStore::new(pool);

    let alice = CustomerStore::insert(
        &store,
        &NewCustomer {
            name: "Alice Example".to_owned(),
            email: Email::parse("alice@example.com")?,
            phone: Some("555-0100".to_owned()),
            address: Some("1 Main St".to_owned()),
            password: "change-me".to_owned(),
        },
    )
    .await?;
    CustomerStore::insert(
        &store,
        &NewCustomer {
            name: "Bob Example".to_owned(),
            email: Email::parse("bob@example.com")?,
            phone: None,
            address: None,
            password: "change-me".to_owned(),
        },
    )
    .await?;

    let widget = ProductStore::insert(
        &store,
        &NewProduct {
            name: "Widget".to_owned(),
            description: Some("A fine widget".to_owned()),
            price: Decimal::new(1999, 2),
        },
    )
    .await?;
    let gadget = ProductStore::insert(
        &store,
        &NewProduct {
            name: "Gadget".to_owned(),
            description: None,
            price: Decimal::new(4950, 2),
        },
    )
    .await?;

    let order = OrderStore::insert(
        &store,
        &NewOrder {
            customer_id: alice.id,
            order_date: Utc::now(),
            total: Decimal::new(8948, 2),
            status: OrderStatus::Pending,
        },
    )
    .await?;

    OrderItemStore::insert(
        &store,
        &NewOrderItem {
            order_id: order.id,
            product_id: widget.id,
            quantity: 2,
            unit_price: Decimal::new(1999, 2),
        },
    )
    .await?;
    OrderItemStore::insert(
        &store,
        &NewOrderItem {
            order_id: order.id,
            product_id: gadget.id,
            quantity: 1,
            unit_price: Decimal::new(4950, 2),
        },
    )
    .await?;

    tracing::info!(order = %order.id, "Seed data inserted");
    Ok(())
}
