//! In-memory entity stores.
//!
//! Backs tests and local development. The maps live behind a single
//! `parking_lot::RwLock`, and the unique-email, reference-existence, and
//! delete-restrict rules of the PostgreSQL schema are enforced by hand so
//! callers observe the same behavior against either backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use tangerine_core::{CustomerId, OrderId, OrderItemId, ProductId};

use super::{CustomerStore, OrderItemStore, OrderStore, ProductStore, StoreError};
use crate::models::{
    Customer, NewCustomer, NewOrder, NewOrderItem, NewProduct, Order, OrderItem, Product,
};

/// In-memory implementation of all four entity stores.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    customers: BTreeMap<i32, Customer>,
    products: BTreeMap<i32, Product>,
    orders: BTreeMap<i32, Order>,
    order_items: BTreeMap<i32, OrderItem>,
    next_customer_id: i32,
    next_product_id: i32,
    next_order_id: i32,
    next_order_item_id: i32,
}

impl Inner {
    /// Item ids referencing an order, in id order.
    fn item_ids_for(&self, order_id: OrderId) -> Vec<OrderItemId> {
        self.order_items
            .values()
            .filter(|item| item.order_id == order_id)
            .map(|item| item.id)
            .collect()
    }

    /// An order with its derived item list filled in.
    fn order_with_items(&self, order: &Order) -> Order {
        Order {
            order_items: self.item_ids_for(order.id),
            ..order.clone()
        }
    }

    /// Enforce the unique index on customer email, excluding `except`.
    fn check_unique_email(
        &self,
        email: &str,
        except: Option<CustomerId>,
    ) -> Result<(), StoreError> {
        let taken = self
            .customers
            .values()
            .any(|c| c.email.as_str() == email && Some(c.id) != except);
        if taken {
            return Err(StoreError::UniqueViolation(format!(
                "customer email already exists: {email}"
            )));
        }
        Ok(())
    }

    fn check_order_refs(&self, new: &NewOrder) -> Result<(), StoreError> {
        if !self.customers.contains_key(&new.customer_id.as_i32()) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "no customer with id {}",
                new.customer_id
            )));
        }
        Ok(())
    }

    fn check_order_item_refs(&self, new: &NewOrderItem) -> Result<(), StoreError> {
        if !self.orders.contains_key(&new.order_id.as_i32()) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "no order with id {}",
                new.order_id
            )));
        }
        if !self.products.contains_key(&new.product_id.as_i32()) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "no product with id {}",
                new.product_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn insert(&self, new: &NewCustomer) -> Result<Customer, StoreError> {
        let mut inner = self.inner.write();
        inner.check_unique_email(new.email.as_str(), None)?;

        inner.next_customer_id += 1;
        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::new(inner.next_customer_id),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            address: new.address.clone(),
            password: new.password.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.customers.insert(customer.id.as_i32(), customer.clone());
        Ok(customer)
    }

    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.inner.read().customers.get(&id.as_i32()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        Ok(self.inner.read().customers.values().cloned().collect())
    }

    async fn update(&self, id: CustomerId, new: &NewCustomer) -> Result<Customer, StoreError> {
        let mut inner = self.inner.write();
        inner.check_unique_email(new.email.as_str(), Some(id))?;

        let now = Utc::now();
        let existing = inner
            .customers
            .get_mut(&id.as_i32())
            .ok_or(StoreError::NotFound)?;
        existing.name = new.name.clone();
        existing.email = new.email.clone();
        existing.phone = new.phone.clone();
        existing.address = new.address.clone();
        existing.password = new.password.clone();
        existing.updated_at = now;
        Ok(existing.clone())
    }

    async fn delete(&self, id: CustomerId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !inner.customers.contains_key(&id.as_i32()) {
            return Err(StoreError::NotFound);
        }
        if inner.orders.values().any(|o| o.customer_id == id) {
            return Err(StoreError::ReferencedBy(format!(
                "customer {id} is still referenced by an order"
            )));
        }
        inner.customers.remove(&id.as_i32());
        Ok(())
    }

    async fn exists(&self, id: CustomerId) -> Result<bool, StoreError> {
        Ok(self.inner.read().customers.contains_key(&id.as_i32()))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert(&self, new: &NewProduct) -> Result<Product, StoreError> {
        let mut inner = self.inner.write();
        inner.next_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(inner.next_product_id),
            name: new.name.clone(),
            description: new.description.clone(),
            price: new.price,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(product.id.as_i32(), product.clone());
        Ok(product)
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.inner.read().products.get(&id.as_i32()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.inner.read().products.values().cloned().collect())
    }

    async fn update(&self, id: ProductId, new: &NewProduct) -> Result<Product, StoreError> {
        let mut inner = self.inner.write();
        let now = Utc::now();
        let existing = inner
            .products
            .get_mut(&id.as_i32())
            .ok_or(StoreError::NotFound)?;
        existing.name = new.name.clone();
        existing.description = new.description.clone();
        existing.price = new.price;
        existing.updated_at = now;
        Ok(existing.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !inner.products.contains_key(&id.as_i32()) {
            return Err(StoreError::NotFound);
        }
        if inner.order_items.values().any(|item| item.product_id == id) {
            return Err(StoreError::ReferencedBy(format!(
                "product {id} is still referenced by an order item"
            )));
        }
        inner.products.remove(&id.as_i32());
        Ok(())
    }

    async fn exists(&self, id: ProductId) -> Result<bool, StoreError> {
        Ok(self.inner.read().products.contains_key(&id.as_i32()))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, new: &NewOrder) -> Result<Order, StoreError> {
        let mut inner = self.inner.write();
        inner.check_order_refs(new)?;

        inner.next_order_id += 1;
        let now = Utc::now();
        let order = Order {
            id: OrderId::new(inner.next_order_id),
            customer_id: new.customer_id,
            order_date: new.order_date,
            total: new.total,
            status: new.status,
            order_items: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        inner.orders.insert(order.id.as_i32(), order.clone());
        Ok(order)
    }

    async fn find(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .orders
            .get(&id.as_i32())
            .map(|order| inner.order_with_items(order)))
    }

    async fn find_all(&self) -> Result<Vec<Order>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .orders
            .values()
            .map(|order| inner.order_with_items(order))
            .collect())
    }

    async fn update(&self, id: OrderId, new: &NewOrder) -> Result<Order, StoreError> {
        let mut inner = self.inner.write();
        inner.check_order_refs(new)?;
        if !inner.orders.contains_key(&id.as_i32()) {
            return Err(StoreError::NotFound);
        }

        let now = Utc::now();
        if let Some(existing) = inner.orders.get_mut(&id.as_i32()) {
            existing.customer_id = new.customer_id;
            existing.order_date = new.order_date;
            existing.total = new.total;
            existing.status = new.status;
            existing.updated_at = now;
        }
        let updated = inner
            .orders
            .get(&id.as_i32())
            .map(|order| inner.order_with_items(order))
            .ok_or(StoreError::NotFound)?;
        Ok(updated)
    }

    async fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !inner.orders.contains_key(&id.as_i32()) {
            return Err(StoreError::NotFound);
        }
        if inner.order_items.values().any(|item| item.order_id == id) {
            return Err(StoreError::ReferencedBy(format!(
                "order {id} is still referenced by an order item"
            )));
        }
        inner.orders.remove(&id.as_i32());
        Ok(())
    }

    async fn exists(&self, id: OrderId) -> Result<bool, StoreError> {
        Ok(self.inner.read().orders.contains_key(&id.as_i32()))
    }
}

#[async_trait]
impl OrderItemStore for MemoryStore {
    async fn insert(&self, new: &NewOrderItem) -> Result<OrderItem, StoreError> {
        let mut inner = self.inner.write();
        inner.check_order_item_refs(new)?;

        inner.next_order_item_id += 1;
        let now = Utc::now();
        let item = OrderItem {
            id: OrderItemId::new(inner.next_order_item_id),
            order_id: new.order_id,
            product_id: new.product_id,
            quantity: new.quantity,
            unit_price: new.unit_price,
            created_at: now,
            updated_at: now,
        };
        inner.order_items.insert(item.id.as_i32(), item.clone());
        Ok(item)
    }

    async fn find(&self, id: OrderItemId) -> Result<Option<OrderItem>, StoreError> {
        Ok(self.inner.read().order_items.get(&id.as_i32()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self.inner.read().order_items.values().cloned().collect())
    }

    async fn update(&self, id: OrderItemId, new: &NewOrderItem) -> Result<OrderItem, StoreError> {
        let mut inner = self.inner.write();
        inner.check_order_item_refs(new)?;

        let now = Utc::now();
        let existing = inner
            .order_items
            .get_mut(&id.as_i32())
            .ok_or(StoreError::NotFound)?;
        existing.order_id = new.order_id;
        existing.product_id = new.product_id;
        existing.quantity = new.quantity;
        existing.unit_price = new.unit_price;
        existing.updated_at = now;
        Ok(existing.clone())
    }

    async fn delete(&self, id: OrderItemId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.order_items.remove(&id.as_i32()).is_none() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn exists(&self, id: OrderItemId) -> Result<bool, StoreError> {
        Ok(self.inner.read().order_items.contains_key(&id.as_i32()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use tangerine_core::{Email, OrderStatus};

    use super::*;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            name: "Alice".to_owned(),
            email: Email::parse(email).unwrap(),
            phone: None,
            address: None,
            password: "hunter2".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let store = MemoryStore::default();
        let a = CustomerStore::insert(&store, &new_customer("a@x.com"))
            .await
            .unwrap();
        let b = CustomerStore::insert(&store, &new_customer("b@x.com"))
            .await
            .unwrap();
        assert_eq!(a.id.as_i32() + 1, b.id.as_i32());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::default();
        CustomerStore::insert(&store, &new_customer("a@x.com"))
            .await
            .unwrap();
        let err = CustomerStore::insert(&store, &new_customer("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_order_insert_requires_customer() {
        let store = MemoryStore::default();
        let err = OrderStore::insert(
            &store,
            &NewOrder {
                customer_id: CustomerId::new(999),
                order_date: Utc::now(),
                total: Decimal::TEN,
                status: OrderStatus::Pending,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn test_delete_referenced_customer_restricted() {
        let store = MemoryStore::default();
        let customer = CustomerStore::insert(&store, &new_customer("a@x.com"))
            .await
            .unwrap();
        let order = OrderStore::insert(
            &store,
            &NewOrder {
                customer_id: customer.id,
                order_date: Utc::now(),
                total: Decimal::TEN,
                status: OrderStatus::Pending,
            },
        )
        .await
        .unwrap();

        let err = CustomerStore::delete(&store, customer.id).await.unwrap_err();
        assert!(matches!(err, StoreError::ReferencedBy(_)));

        OrderStore::delete(&store, order.id).await.unwrap();
        CustomerStore::delete(&store, customer.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_order_reports_its_item_ids() {
        let store = MemoryStore::default();
        let customer = CustomerStore::insert(&store, &new_customer("a@x.com"))
            .await
            .unwrap();
        let product = ProductStore::insert(
            &store,
            &NewProduct {
                name: "Widget".to_owned(),
                description: None,
                price: Decimal::ONE,
            },
        )
        .await
        .unwrap();
        let order = OrderStore::insert(
            &store,
            &NewOrder {
                customer_id: customer.id,
                order_date: Utc::now(),
                total: Decimal::TEN,
                status: OrderStatus::Pending,
            },
        )
        .await
        .unwrap();
        let item = OrderItemStore::insert(
            &store,
            &NewOrderItem {
                order_id: order.id,
                product_id: product.id,
                quantity: 2,
                unit_price: Decimal::ONE,
            },
        )
        .await
        .unwrap();

        let fetched = OrderStore::find(&store, order.id).await.unwrap().unwrap();
        assert_eq!(fetched.order_items, vec![item.id]);
    }
}
