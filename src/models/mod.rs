//! Request and response bodies for the typed endpoints.
//!
//! Every optional field deserializes from either an absent key or `null`
//! and is omitted when serialized. Money amounts are kept as the decimal
//! strings the API sends so no precision is lost.
//!
//! # Example
//!
//! ```rust
//! use grocer_api::models::OrdersPage;
//!
//! let page: OrdersPage = serde_json::from_str(
//!     r#"{"count": 1, "next_page": null, "results": [{"id": 42}]}"#,
//! ).unwrap();
//!
//! assert_eq!(page.results[0].id, 42);
//! assert!(page.next_page.is_none());
//! ```

#![warn(missing_docs)]

mod cart;
mod customer;
mod order;
mod recommendation;
mod warehouse;

pub use cart::{Cart, CartItem, CartItemUpdate, CartUpdate};
pub use customer::Customer;
pub use order::{Order, OrderLine, OrderLines, OrdersPage};
pub use recommendation::{RecommendedProduct, Recommendations};
pub use warehouse::{WarehouseChange, WarehouseChangeRequest};
