//! Order model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tangerine_core::{CustomerId, OrderId, OrderItemId, OrderStatus};

/// A stored order.
///
/// `order_items` is derived from the order-item rows referencing this order
/// and is returned for display only; it is never accepted as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub order_items: Vec<OrderItemId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire input for creating or replacing an order.
///
/// Replace is whole-record: an omitted `status` becomes `PENDING` and an
/// omitted `orderDate` becomes "now", regardless of what was stored before.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDraft {
    pub customer_id: Option<CustomerId>,
    pub order_date: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub status: OrderStatus,
}

/// A validated order value, ready to persist.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub total: Decimal,
    pub status: OrderStatus,
}
