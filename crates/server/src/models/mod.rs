//! Domain models for the four CRUD resources.
//!
//! Each resource comes in three shapes:
//!
//! - the stored entity (`Customer`, `Product`, `Order`, `OrderItem`) with its
//!   store-assigned id and timestamps,
//! - a `*Draft` — the unvalidated wire input for create/replace requests
//!   (every field defaults, so an omitted field is the default value, never
//!   "unchanged"), and
//! - a `New*` — the validated, normalized value the store persists.

pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;

pub use customer::{Customer, CustomerDraft, NewCustomer};
pub use order::{NewOrder, Order, OrderDraft};
pub use order_item::{NewOrderItem, OrderItem, OrderItemDraft};
pub use product::{NewProduct, Product, ProductDraft};
