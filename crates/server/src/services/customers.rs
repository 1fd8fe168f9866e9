//! Customer resource service.

use std::sync::Arc;

use tangerine_core::CustomerId;

use crate::error::AppError;
use crate::models::{Customer, CustomerDraft};
use crate::store::CustomerStore;
use crate::validation;

/// CRUD orchestration for customers.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    /// List all customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.store.find_all().await?)
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no customer has the given id.
    pub async fn get(&self, id: CustomerId) -> Result<Customer, AppError> {
        self.store.find(id).await?.ok_or(AppError::NotFound {
            resource: "customer",
            id: id.as_i32(),
        })
    }

    /// Validate and persist a new customer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input and a conflict for a
    /// duplicate email.
    pub async fn create(&self, draft: &CustomerDraft) -> Result<Customer, AppError> {
        let new = validation::validate_customer(draft)?;
        Ok(self.store.insert(&new).await?)
    }

    /// Whole-record replace of a customer's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the id does not exist, a validation
    /// error for bad input, and a conflict for a duplicate email.
    pub async fn replace(&self, id: CustomerId, draft: &CustomerDraft) -> Result<Customer, AppError> {
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound {
                resource: "customer",
                id: id.as_i32(),
            });
        }
        let new = validation::validate_customer(draft)?;
        Ok(self.store.update(id, &new).await?)
    }

    /// Hard-delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the id does not exist and a conflict
    /// if an order still references the customer.
    pub async fn remove(&self, id: CustomerId) -> Result<(), AppError> {
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound {
                resource: "customer",
                id: id.as_i32(),
            });
        }
        Ok(self.store.delete(id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::store::memory::MemoryStore;
    use crate::validation::ValidationError;

    use super::*;

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(MemoryStore::default()))
    }

    fn draft(email: &str) -> CustomerDraft {
        CustomerDraft {
            name: "Alice".to_owned(),
            email: email.to_owned(),
            phone: Some("555-0100".to_owned()),
            address: None,
            password: "hunter2".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let svc = service();
        let created = svc.create(&draft("a@x.com")).await.unwrap();
        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let svc = service();
        let err = svc.get(CustomerId::new(999)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { resource: "customer", .. }));
    }

    #[tokio::test]
    async fn test_replace_unknown_id_is_not_found() {
        let svc = service();
        let err = svc
            .replace(CustomerId::new(999), &draft("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_replace_overwrites_every_field() {
        let svc = service();
        let created = svc.create(&draft("a@x.com")).await.unwrap();

        // The new draft omits phone; after replace it is gone, not kept.
        let replacement = CustomerDraft {
            name: "Alicia".to_owned(),
            email: "alicia@x.com".to_owned(),
            phone: None,
            address: Some("1 Main St".to_owned()),
            password: "correct-horse".to_owned(),
        };
        let updated = svc.replace(created.id, &replacement).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.phone, None);
        assert_eq!(updated.address.as_deref(), Some("1 Main St"));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let svc = service();
        let created = svc.create(&draft("a@x.com")).await.unwrap();
        svc.remove(created.id).await.unwrap();
        assert!(matches!(
            svc.get(created.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            svc.remove(created.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let svc = service();
        svc.create(&draft("a@x.com")).await.unwrap();
        let err = svc.create(&draft("a@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_missing_password_is_rejected() {
        let svc = service();
        let bad = CustomerDraft {
            password: String::new(),
            ..draft("a@x.com")
        };
        let err = svc.create(&bad).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingField("password"))
        ));
    }
}
