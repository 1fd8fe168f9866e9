//! Order item resource service.

use std::sync::Arc;

use tangerine_core::OrderItemId;

use crate::error::AppError;
use crate::models::{OrderItem, OrderItemDraft};
use crate::store::{OrderItemStore, OrderStore, ProductStore};
use crate::validation::{self, ValidationError};

/// CRUD orchestration for order items.
///
/// Holds the order and product stores so both references can be resolved
/// before a write reaches the item store.
#[derive(Clone)]
pub struct OrderItemService {
    store: Arc<dyn OrderItemStore>,
    orders: Arc<dyn OrderStore>,
    products: Arc<dyn ProductStore>,
}

impl OrderItemService {
    /// Create a service over the given stores.
    #[must_use]
    pub fn new(
        store: Arc<dyn OrderItemStore>,
        orders: Arc<dyn OrderStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        Self {
            store,
            orders,
            products,
        }
    }

    /// List all order items.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(&self) -> Result<Vec<OrderItem>, AppError> {
        Ok(self.store.find_all().await?)
    }

    /// Get an order item by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no order item has the given id.
    pub async fn get(&self, id: OrderItemId) -> Result<OrderItem, AppError> {
        self.store.find(id).await?.ok_or(AppError::NotFound {
            resource: "order item",
            id: id.as_i32(),
        })
    }

    /// Validate and persist a new order item.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, including a
    /// `DanglingReference` when `orderId` or `productId` does not resolve.
    pub async fn create(&self, draft: &OrderItemDraft) -> Result<OrderItem, AppError> {
        let new = validation::validate_order_item(draft)?;
        self.check_references(&new).await?;
        Ok(self.store.insert(&new).await?)
    }

    /// Whole-record replace of an order item's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the id does not exist and a
    /// validation error for bad input or dangling references.
    pub async fn replace(
        &self,
        id: OrderItemId,
        draft: &OrderItemDraft,
    ) -> Result<OrderItem, AppError> {
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound {
                resource: "order item",
                id: id.as_i32(),
            });
        }
        let new = validation::validate_order_item(draft)?;
        self.check_references(&new).await?;
        Ok(self.store.update(id, &new).await?)
    }

    /// Hard-delete an order item.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the id does not exist.
    pub async fn remove(&self, id: OrderItemId) -> Result<(), AppError> {
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound {
                resource: "order item",
                id: id.as_i32(),
            });
        }
        Ok(self.store.delete(id).await?)
    }

    async fn check_references(&self, new: &crate::models::NewOrderItem) -> Result<(), AppError> {
        if !self.orders.exists(new.order_id).await? {
            return Err(ValidationError::DanglingReference {
                field: "orderId",
                id: new.order_id.as_i32(),
            }
            .into());
        }
        if !self.products.exists(new.product_id).await? {
            return Err(ValidationError::DanglingReference {
                field: "productId",
                id: new.product_id.as_i32(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use tangerine_core::{Email, OrderId, OrderStatus, ProductId};

    use crate::models::{NewCustomer, NewOrder, NewProduct};
    use crate::store::memory::MemoryStore;
    use crate::store::CustomerStore;

    use super::*;

    struct Fixture {
        svc: OrderItemService,
        order_id: OrderId,
        product_id: ProductId,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::default());
        let customer = CustomerStore::insert(
            store.as_ref(),
            &NewCustomer {
                name: "Alice".to_owned(),
                email: Email::parse("a@x.com").unwrap(),
                phone: None,
                address: None,
                password: "hunter2".to_owned(),
            },
        )
        .await
        .unwrap();
        let order = OrderStore::insert(
            store.as_ref(),
            &NewOrder {
                customer_id: customer.id,
                order_date: Utc::now(),
                total: Decimal::TEN,
                status: OrderStatus::Pending,
            },
        )
        .await
        .unwrap();
        let product = ProductStore::insert(
            store.as_ref(),
            &NewProduct {
                name: "Widget".to_owned(),
                description: None,
                price: Decimal::new(500, 2),
            },
        )
        .await
        .unwrap();

        Fixture {
            svc: OrderItemService::new(store.clone(), store.clone(), store),
            order_id: order.id,
            product_id: product.id,
        }
    }

    fn draft(order_id: OrderId, product_id: ProductId) -> OrderItemDraft {
        OrderItemDraft {
            order_id: Some(order_id),
            product_id: Some(product_id),
            quantity: 2,
            unit_price: Decimal::new(500, 2),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let f = fixture().await;
        let created = f.svc.create(&draft(f.order_id, f.product_id)).await.unwrap();
        assert_eq!(f.svc.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_dangling_order_is_rejected_and_nothing_persists() {
        let f = fixture().await;
        let err = f
            .svc
            .create(&draft(OrderId::new(999), f.product_id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::DanglingReference {
                field: "orderId",
                id: 999,
            })
        ));
        assert!(f.svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dangling_product_is_rejected() {
        let f = fixture().await;
        let err = f
            .svc
            .create(&draft(f.order_id, ProductId::new(999)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::DanglingReference {
                field: "productId",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let f = fixture().await;
        let created = f.svc.create(&draft(f.order_id, f.product_id)).await.unwrap();
        f.svc.remove(created.id).await.unwrap();
        assert!(matches!(
            f.svc.get(created.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
