//! PostgreSQL-backed entity stores.
//!
//! All four store traits are implemented by a single [`PgStore`] over one
//! connection pool. Queries use the runtime sqlx API; constraint failures
//! reported by PostgreSQL are classified into typed [`StoreError`] kinds so
//! callers never have to inspect driver errors.
//!
//! The schema's `ON DELETE RESTRICT` foreign keys are the authoritative
//! referential guard: the services' existence pre-checks are a fast path,
//! and a race that slips past them still fails here.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use tangerine_core::{CustomerId, Email, OrderId, OrderItemId, OrderStatus, ProductId};

use super::{CustomerStore, OrderItemStore, OrderStore, ProductStore, StoreError};
use crate::models::{
    Customer, NewCustomer, NewOrder, NewOrderItem, NewProduct, Order, OrderItem, Product,
};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Classify an error from an INSERT/UPDATE.
fn write_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::UniqueViolation(db.message().to_owned())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::ForeignKeyViolation(db.message().to_owned())
        }
        _ => StoreError::Database(e),
    }
}

/// Classify an error from a DELETE. A foreign-key failure here means
/// dependent rows still reference the row being deleted.
fn delete_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::ReferencedBy(db.message().to_owned())
        }
        _ => StoreError::Database(e),
    }
}

/// PostgreSQL implementation of all four entity stores.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Item ids belonging to an order, in id order.
    async fn order_item_ids(&self, id: OrderId) -> Result<Vec<OrderItemId>, StoreError> {
        let ids = sqlx::query_scalar::<_, OrderItemId>(
            "SELECT id FROM shop.order_item WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn order_from_row(&self, row: OrderRow) -> Result<Order, StoreError> {
        let order_items = self.order_item_ids(row.id).await?;
        Ok(Order {
            id: row.id,
            customer_id: row.customer_id,
            order_date: row.order_date,
            total: row.total,
            status: row.status,
            order_items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    name: String,
    email: Email,
    phone: Option<String>,
    address: Option<String>,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            password: row.password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: CustomerId,
    order_date: DateTime<Utc>,
    total: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    unit_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, address, password, created_at, updated_at";

#[async_trait]
impl CustomerStore for PgStore {
    async fn insert(&self, new: &NewCustomer) -> Result<Customer, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO shop.customer (name, email, phone, address, password)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.email.as_str())
        .bind(&new.phone)
        .bind(&new.address)
        .bind(&new.password)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(row.into())
    }

    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.customer WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.customer ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: CustomerId, new: &NewCustomer) -> Result<Customer, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE shop.customer
             SET name = $2, email = $3, phone = $4, address = $5, password = $6,
                 updated_at = now()
             WHERE id = $1
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id)
        .bind(&new.name)
        .bind(new.email.as_str())
        .bind(&new.phone)
        .bind(&new.address)
        .bind(&new.password)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        row.map(Into::into).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: CustomerId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shop.customer WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(delete_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn exists(&self, id: CustomerId) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM shop.customer WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price, created_at, updated_at";

#[async_trait]
impl ProductStore for PgStore {
    async fn insert(&self, new: &NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO shop.product (name, description, price)
             VALUES ($1, $2, $3)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(row.into())
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: ProductId, new: &NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE shop.product
             SET name = $2, description = $3, price = $4, updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        row.map(Into::into).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(delete_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn exists(&self, id: ProductId) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM shop.product WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

const ORDER_COLUMNS: &str = "id, customer_id, order_date, total, status, created_at, updated_at";

#[async_trait]
impl OrderStore for PgStore {
    async fn insert(&self, new: &NewOrder) -> Result<Order, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO shop.orders (customer_id, order_date, total, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new.customer_id)
        .bind(new.order_date)
        .bind(new.total)
        .bind(new.status)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        // A freshly inserted order cannot have items yet.
        Ok(Order {
            id: row.id,
            customer_id: row.customer_id,
            order_date: row.order_date,
            total: row.total,
            status: row.status,
            order_items: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn find(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.order_from_row(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.order_from_row(row).await?);
        }
        Ok(orders)
    }

    async fn update(&self, id: OrderId, new: &NewOrder) -> Result<Order, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE shop.orders
             SET customer_id = $2, order_date = $3, total = $4, status = $5,
                 updated_at = now()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(new.customer_id)
        .bind(new.order_date)
        .bind(new.total)
        .bind(new.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        match row {
            Some(row) => self.order_from_row(row).await,
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shop.orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(delete_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn exists(&self, id: OrderId) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM shop.orders WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, quantity, unit_price, created_at, updated_at";

#[async_trait]
impl OrderItemStore for PgStore {
    async fn insert(&self, new: &NewOrderItem) -> Result<OrderItem, StoreError> {
        let row = sqlx::query_as::<_, OrderItemRow>(&format!(
            "INSERT INTO shop.order_item (order_id, product_id, quantity, unit_price)
             VALUES ($1, $2, $3, $4)
             RETURNING {ORDER_ITEM_COLUMNS}"
        ))
        .bind(new.order_id)
        .bind(new.product_id)
        .bind(new.quantity)
        .bind(new.unit_price)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(row.into())
    }

    async fn find(&self, id: OrderItemId) -> Result<Option<OrderItem>, StoreError> {
        let row = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM shop.order_item WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<OrderItem>, StoreError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM shop.order_item ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: OrderItemId, new: &NewOrderItem) -> Result<OrderItem, StoreError> {
        let row = sqlx::query_as::<_, OrderItemRow>(&format!(
            "UPDATE shop.order_item
             SET order_id = $2, product_id = $3, quantity = $4, unit_price = $5,
                 updated_at = now()
             WHERE id = $1
             RETURNING {ORDER_ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(new.order_id)
        .bind(new.product_id)
        .bind(new.quantity)
        .bind(new.unit_price)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        row.map(Into::into).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: OrderItemId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shop.order_item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(delete_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn exists(&self, id: OrderItemId) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM shop.order_item WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
