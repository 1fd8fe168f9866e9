//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::{CustomerService, OrderItemService, OrderService, ProductService};
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgStore;
use crate::store::{CustomerStore, OrderItemStore, OrderStore, ProductStore};

/// Application state shared across all handlers.
///
/// Services receive their stores here, at construction; nothing reaches for
/// a global registry.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    customers: CustomerService,
    products: ProductService,
    orders: OrderService,
    order_items: OrderItemService,
}

impl AppState {
    /// Wire all four services over one store implementation.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CustomerStore + ProductStore + OrderStore + OrderItemStore + 'static,
    {
        let customers_store: Arc<dyn CustomerStore> = store.clone();
        let products_store: Arc<dyn ProductStore> = store.clone();
        let orders_store: Arc<dyn OrderStore> = store.clone();
        let order_items_store: Arc<dyn OrderItemStore> = store;

        Self {
            inner: Arc::new(AppStateInner {
                customers: CustomerService::new(customers_store.clone()),
                products: ProductService::new(products_store.clone()),
                orders: OrderService::new(orders_store.clone(), customers_store),
                order_items: OrderItemService::new(
                    order_items_store,
                    orders_store,
                    products_store,
                ),
            }),
        }
    }

    /// State backed by PostgreSQL (production).
    #[must_use]
    pub fn from_postgres(pool: PgPool) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool)))
    }

    /// State backed by the in-memory store (tests, local development).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::default()))
    }

    #[must_use]
    pub fn customers(&self) -> &CustomerService {
        &self.inner.customers
    }

    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    #[must_use]
    pub fn order_items(&self) -> &OrderItemService {
        &self.inner.order_items
    }
}
