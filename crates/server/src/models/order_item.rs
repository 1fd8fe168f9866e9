//! Order item model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tangerine_core::{OrderId, OrderItemId, ProductId};

/// A stored order line item.
///
/// Order items are independent rows: they reference their order and product
/// by id and are created, replaced, and deleted through their own endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire input for creating or replacing an order item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemDraft {
    pub order_id: Option<OrderId>,
    pub product_id: Option<ProductId>,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// A validated order item value, ready to persist.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
}
