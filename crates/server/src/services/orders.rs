//! Order resource service.

use std::sync::Arc;

use tangerine_core::OrderId;

use crate::error::AppError;
use crate::models::{Order, OrderDraft};
use crate::store::{CustomerStore, OrderStore};
use crate::validation::{self, ValidationError};

/// CRUD orchestration for orders.
///
/// Holds the customer store alongside its own so `customerId` references
/// can be resolved before a write. The pre-check is a fast path only; the
/// store's foreign-key constraint remains the authoritative guard.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    customers: Arc<dyn CustomerStore>,
}

impl OrderService {
    /// Create a service over the given stores.
    #[must_use]
    pub fn new(store: Arc<dyn OrderStore>, customers: Arc<dyn CustomerStore>) -> Self {
        Self { store, customers }
    }

    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.store.find_all().await?)
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no order has the given id.
    pub async fn get(&self, id: OrderId) -> Result<Order, AppError> {
        self.store.find(id).await?.ok_or(AppError::NotFound {
            resource: "order",
            id: id.as_i32(),
        })
    }

    /// Validate and persist a new order.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, including a
    /// `DanglingReference` when `customerId` does not resolve.
    pub async fn create(&self, draft: &OrderDraft) -> Result<Order, AppError> {
        let new = validation::validate_order(draft)?;
        if !self.customers.exists(new.customer_id).await? {
            return Err(ValidationError::DanglingReference {
                field: "customerId",
                id: new.customer_id.as_i32(),
            }
            .into());
        }
        Ok(self.store.insert(&new).await?)
    }

    /// Whole-record replace of an order's mutable fields.
    ///
    /// Any status may replace any other; there is no transition guard. A
    /// draft that omits `status` resets it to the default, not to the
    /// previously stored value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the id does not exist and a
    /// validation error for bad input or a dangling `customerId`.
    pub async fn replace(&self, id: OrderId, draft: &OrderDraft) -> Result<Order, AppError> {
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound {
                resource: "order",
                id: id.as_i32(),
            });
        }
        let new = validation::validate_order(draft)?;
        if !self.customers.exists(new.customer_id).await? {
            return Err(ValidationError::DanglingReference {
                field: "customerId",
                id: new.customer_id.as_i32(),
            }
            .into());
        }
        Ok(self.store.update(id, &new).await?)
    }

    /// Hard-delete an order. Its order items are not cascaded: while any
    /// remain, the delete is a conflict.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the id does not exist and a conflict
    /// if an order item still references the order.
    pub async fn remove(&self, id: OrderId) -> Result<(), AppError> {
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound {
                resource: "order",
                id: id.as_i32(),
            });
        }
        Ok(self.store.delete(id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use tangerine_core::{CustomerId, Email, OrderStatus};

    use crate::models::NewCustomer;
    use crate::store::memory::MemoryStore;

    use super::*;

    async fn service_with_customer() -> (OrderService, CustomerId) {
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
        let svc = OrderService::new(store.clone(), store);
        (svc, customer.id)
    }

    fn draft(customer_id: CustomerId, status: OrderStatus) -> OrderDraft {
        OrderDraft {
            customer_id: Some(customer_id),
            order_date: None,
            total: Decimal::TEN,
            status,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (svc, customer_id) = service_with_customer().await;
        let created = svc
            .create(&draft(customer_id, OrderStatus::Pending))
            .await
            .unwrap();
        assert_eq!(svc.get(created.id).await.unwrap(), created);
        assert!(created.order_items.is_empty());
    }

    #[tokio::test]
    async fn test_dangling_customer_is_rejected() {
        let (svc, _) = service_with_customer().await;
        let err = svc
            .create(&draft(CustomerId::new(999), OrderStatus::Pending))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::DanglingReference {
                field: "customerId",
                id: 999,
            })
        ));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_omitting_status_resets_to_default() {
        let (svc, customer_id) = service_with_customer().await;
        let created = svc
            .create(&draft(customer_id, OrderStatus::Paid))
            .await
            .unwrap();
        assert_eq!(created.status, OrderStatus::Paid);

        // Whole-record replace: the default status wins, not the stored one.
        let replacement = OrderDraft {
            customer_id: Some(customer_id),
            order_date: None,
            total: Decimal::TEN,
            ..OrderDraft::default()
        };
        let updated = svc.replace(created.id, &replacement).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_any_status_may_replace_any_other() {
        let (svc, customer_id) = service_with_customer().await;
        let created = svc
            .create(&draft(customer_id, OrderStatus::Shipped))
            .await
            .unwrap();
        let updated = svc
            .replace(created.id, &draft(customer_id, OrderStatus::Pending))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_id_operations_are_not_found() {
        let (svc, customer_id) = service_with_customer().await;
        let id = OrderId::new(404);
        assert!(matches!(
            svc.get(id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            svc.remove(id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            svc.replace(id, &draft(customer_id, OrderStatus::Pending))
                .await
                .unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
