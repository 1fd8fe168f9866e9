//! Resource services.
//!
//! One service per resource, all following the same pattern: list, get,
//! create, replace, remove. Each service validates input, resolves
//! cross-entity references through the stores it was constructed with, and
//! translates store failures into [`crate::error::AppError`].
//!
//! Services are stateless between calls and hold no locks; concurrent
//! replaces of the same row are last-writer-wins, with per-row atomicity
//! coming from the store.

pub mod customers;
pub mod order_items;
pub mod orders;
pub mod products;

pub use customers::CustomerService;
pub use order_items::OrderItemService;
pub use orders::OrderService;
pub use products::ProductService;
