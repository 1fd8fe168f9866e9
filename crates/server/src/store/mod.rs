//! Entity store abstraction.
//!
//! One trait per resource, each offering the same six operations: insert,
//! find, find-all, whole-row update, delete, and an existence probe used as
//! the fast-path reference pre-check. Two backends implement them:
//!
//! - [`postgres::PgStore`] — production, one table per resource with
//!   `ON DELETE RESTRICT` foreign keys as the authoritative referential
//!   guard.
//! - [`memory::MemoryStore`] — tests and local development; enforces the
//!   same unique and referential rules so tests observe production
//!   semantics.
//!
//! Services receive stores as `Arc<dyn …Store>` at construction; there is no
//! ambient registry.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use tangerine_core::{CustomerId, OrderId, OrderItemId, ProductId};

use crate::models::{
    Customer, NewCustomer, NewOrder, NewOrderItem, NewProduct, Order, OrderItem, Product,
};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matches the given identifier.
    #[error("row not found")]
    NotFound,

    /// A uniqueness rule rejected the write (e.g. duplicate customer email).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A write referenced an id with no corresponding row.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// A delete was rejected because dependent rows still reference the row.
    #[error("row is still referenced: {0}")]
    ReferencedBy(String),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations for customers.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Persist a new customer and return it with its assigned id.
    async fn insert(&self, new: &NewCustomer) -> Result<Customer, StoreError>;

    /// Look up a customer; absent is `Ok(None)`, never an error.
    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// A fresh snapshot of all customers, ordered by id.
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError>;

    /// Replace every mutable field of the row with `id`.
    async fn update(&self, id: CustomerId, new: &NewCustomer) -> Result<Customer, StoreError>;

    /// Hard-delete the row with `id`.
    async fn delete(&self, id: CustomerId) -> Result<(), StoreError>;

    /// Whether a row with `id` exists.
    async fn exists(&self, id: CustomerId) -> Result<bool, StoreError>;
}

/// Persistence operations for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, new: &NewProduct) -> Result<Product, StoreError>;
    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;
    async fn update(&self, id: ProductId, new: &NewProduct) -> Result<Product, StoreError>;
    async fn delete(&self, id: ProductId) -> Result<(), StoreError>;
    async fn exists(&self, id: ProductId) -> Result<bool, StoreError>;
}

/// Persistence operations for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, new: &NewOrder) -> Result<Order, StoreError>;
    async fn find(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
    async fn find_all(&self) -> Result<Vec<Order>, StoreError>;
    async fn update(&self, id: OrderId, new: &NewOrder) -> Result<Order, StoreError>;
    async fn delete(&self, id: OrderId) -> Result<(), StoreError>;
    async fn exists(&self, id: OrderId) -> Result<bool, StoreError>;
}

/// Persistence operations for order items.
#[async_trait]
pub trait OrderItemStore: Send + Sync {
    async fn insert(&self, new: &NewOrderItem) -> Result<OrderItem, StoreError>;
    async fn find(&self, id: OrderItemId) -> Result<Option<OrderItem>, StoreError>;
    async fn find_all(&self) -> Result<Vec<OrderItem>, StoreError>;
    async fn update(&self, id: OrderItemId, new: &NewOrderItem) -> Result<OrderItem, StoreError>;
    async fn delete(&self, id: OrderItemId) -> Result<(), StoreError>;
    async fn exists(&self, id: OrderItemId) -> Result<bool, StoreError>;
}
