//! Field-level validation for create/replace inputs.
//!
//! Each `validate_*` function checks a draft's required fields and range
//! constraints, then produces the normalized `New*` value the store persists.
//! Reference-existence checks (does `customerId` resolve to a row?) are the
//! services' job, since they need a store; the resulting error still lives
//! here so every validation failure shares one shape.
//!
//! Field names in errors use the wire spelling (`customerId`, `unitPrice`)
//! so clients can match them against the request body they sent.

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;

use tangerine_core::Email;

use crate::models::{
    CustomerDraft, NewCustomer, NewOrder, NewOrderItem, NewProduct, OrderDraft, OrderItemDraft,
    ProductDraft,
};

/// A rejected create/replace input, naming the offending field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A string field is present but not a valid email address.
    #[error("invalid email address in field: {0}")]
    InvalidEmail(&'static str),

    /// A numeric field violates its range constraint.
    #[error("value out of range in field: {0}")]
    OutOfRange(&'static str),

    /// A reference field names an id with no corresponding stored row.
    #[error("field {field} references a nonexistent row with id {id}")]
    DanglingReference {
        field: &'static str,
        id: i32,
    },
}

impl ValidationError {
    /// The wire name of the field this error is about.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField(f) | Self::InvalidEmail(f) | Self::OutOfRange(f) => f,
            Self::DanglingReference { field, .. } => field,
        }
    }
}

/// Validate a customer draft.
///
/// # Errors
///
/// Returns `MissingField` for an empty name, email, or password, and
/// `InvalidEmail` when the email fails structural parsing.
pub fn validate_customer(draft: &CustomerDraft) -> Result<NewCustomer, ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    if draft.email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if draft.password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }

    let email = Email::parse(&draft.email).map_err(|_| ValidationError::InvalidEmail("email"))?;

    Ok(NewCustomer {
        name: draft.name.clone(),
        email,
        phone: draft.phone.clone(),
        address: draft.address.clone(),
        password: draft.password.clone(),
    })
}

/// Validate a product draft.
///
/// # Errors
///
/// Returns `MissingField` for an empty name and `OutOfRange` for a negative
/// price. A zero price is valid.
pub fn validate_product(draft: &ProductDraft) -> Result<NewProduct, ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    if draft.price < Decimal::ZERO {
        return Err(ValidationError::OutOfRange("price"));
    }

    Ok(NewProduct {
        name: draft.name.clone(),
        description: draft.description.clone(),
        price: draft.price,
    })
}

/// Validate an order draft.
///
/// An omitted `orderDate` normalizes to the current time. Whether
/// `customerId` resolves is checked by the order service afterwards.
///
/// # Errors
///
/// Returns `MissingField` for an absent customer id and `OutOfRange` for a
/// negative total.
pub fn validate_order(draft: &OrderDraft) -> Result<NewOrder, ValidationError> {
    let customer_id = draft
        .customer_id
        .ok_or(ValidationError::MissingField("customerId"))?;
    if draft.total < Decimal::ZERO {
        return Err(ValidationError::OutOfRange("total"));
    }

    Ok(NewOrder {
        customer_id,
        order_date: draft.order_date.unwrap_or_else(Utc::now),
        total: draft.total,
        status: draft.status,
    })
}

/// Validate an order item draft.
///
/// # Errors
///
/// Returns `MissingField` for an absent order or product id, `OutOfRange`
/// for a non-positive quantity or negative unit price.
pub fn validate_order_item(draft: &OrderItemDraft) -> Result<NewOrderItem, ValidationError> {
    let order_id = draft
        .order_id
        .ok_or(ValidationError::MissingField("orderId"))?;
    let product_id = draft
        .product_id
        .ok_or(ValidationError::MissingField("productId"))?;
    if draft.quantity <= 0 {
        return Err(ValidationError::OutOfRange("quantity"));
    }
    if draft.unit_price < Decimal::ZERO {
        return Err(ValidationError::OutOfRange("unitPrice"));
    }

    Ok(NewOrderItem {
        order_id,
        product_id,
        quantity: draft.quantity,
        unit_price: draft.unit_price,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use tangerine_core::{CustomerId, OrderId, ProductId};

    use super::*;

    fn customer_draft() -> CustomerDraft {
        CustomerDraft {
            name: "Alice".to_owned(),
            email: "a@x.com".to_owned(),
            phone: None,
            address: None,
            password: "hunter2".to_owned(),
        }
    }

    #[test]
    fn test_customer_ok() {
        let new = validate_customer(&customer_draft()).unwrap();
        assert_eq!(new.email.as_str(), "a@x.com");
    }

    #[test]
    fn test_customer_missing_name() {
        let draft = CustomerDraft {
            name: "  ".to_owned(),
            ..customer_draft()
        };
        assert_eq!(
            validate_customer(&draft).unwrap_err(),
            ValidationError::MissingField("name")
        );
    }

    #[test]
    fn test_customer_invalid_email() {
        let draft = CustomerDraft {
            email: "not-an-email".to_owned(),
            ..customer_draft()
        };
        let err = validate_customer(&draft).unwrap_err();
        assert_eq!(err, ValidationError::InvalidEmail("email"));
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn test_product_negative_price() {
        let draft = ProductDraft {
            name: "Widget".to_owned(),
            description: None,
            price: Decimal::NEGATIVE_ONE,
        };
        assert_eq!(
            validate_product(&draft).unwrap_err(),
            ValidationError::OutOfRange("price")
        );
    }

    #[test]
    fn test_product_zero_price_is_valid() {
        let draft = ProductDraft {
            name: "Freebie".to_owned(),
            description: None,
            price: Decimal::ZERO,
        };
        assert!(validate_product(&draft).is_ok());
    }

    #[test]
    fn test_order_requires_customer_id() {
        let draft = OrderDraft::default();
        assert_eq!(
            validate_order(&draft).unwrap_err(),
            ValidationError::MissingField("customerId")
        );
    }

    #[test]
    fn test_order_defaults_date_to_now() {
        let draft = OrderDraft {
            customer_id: Some(CustomerId::new(1)),
            ..OrderDraft::default()
        };
        let before = Utc::now();
        let new = validate_order(&draft).unwrap();
        assert!(new.order_date >= before);
    }

    #[test]
    fn test_order_item_zero_quantity() {
        let draft = OrderItemDraft {
            order_id: Some(OrderId::new(1)),
            product_id: Some(ProductId::new(1)),
            quantity: 0,
            unit_price: Decimal::ONE,
        };
        assert_eq!(
            validate_order_item(&draft).unwrap_err(),
            ValidationError::OutOfRange("quantity")
        );
    }
}
