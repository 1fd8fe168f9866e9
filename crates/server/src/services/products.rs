//! Product resource service.

use std::sync::Arc;

use tangerine_core::ProductId;

use crate::error::AppError;
use crate::models::{Product, ProductDraft};
use crate::store::ProductStore;
use crate::validation;

/// CRUD orchestration for products.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.store.find_all().await?)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has the given id.
    pub async fn get(&self, id: ProductId) -> Result<Product, AppError> {
        self.store.find(id).await?.ok_or(AppError::NotFound {
            resource: "product",
            id: id.as_i32(),
        })
    }

    /// Validate and persist a new product.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or negative price.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, AppError> {
        let new = validation::validate_product(draft)?;
        Ok(self.store.insert(&new).await?)
    }

    /// Whole-record replace of a product's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the id does not exist and a
    /// validation error for bad input.
    pub async fn replace(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, AppError> {
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound {
                resource: "product",
                id: id.as_i32(),
            });
        }
        let new = validation::validate_product(draft)?;
        Ok(self.store.update(id, &new).await?)
    }

    /// Hard-delete a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the id does not exist and a conflict
    /// if an order item still references the product.
    pub async fn remove(&self, id: ProductId) -> Result<(), AppError> {
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound {
                resource: "product",
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

    use crate::store::memory::MemoryStore;
    use crate::validation::ValidationError;

    use super::*;

    fn service() -> ProductService {
        ProductService::new(Arc::new(MemoryStore::default()))
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let svc = service();
        let created = svc
            .create(&ProductDraft {
                name: "Widget".to_owned(),
                description: Some("A fine widget".to_owned()),
                price: Decimal::new(1999, 2),
            })
            .await
            .unwrap();
        assert_eq!(svc.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_negative_price_is_out_of_range() {
        let svc = service();
        let err = svc
            .create(&ProductDraft {
                name: "Widget".to_owned(),
                description: None,
                price: Decimal::NEGATIVE_ONE,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::OutOfRange("price"))
        ));
    }

    #[tokio::test]
    async fn test_zero_price_is_accepted() {
        let svc = service();
        let created = svc
            .create(&ProductDraft {
                name: "Freebie".to_owned(),
                description: None,
                price: Decimal::ZERO,
            })
            .await
            .unwrap();
        assert_eq!(created.price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_id_operations_are_not_found() {
        let svc = service();
        let id = ProductId::new(404);
        assert!(matches!(
            svc.get(id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            svc.remove(id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        let draft = ProductDraft {
            name: "Widget".to_owned(),
            description: None,
            price: Decimal::ONE,
        };
        assert!(matches!(
            svc.replace(id, &draft).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
