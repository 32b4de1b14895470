//! Order history: paged order summaries and the lines of one order.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One page of `GET customers/{id}/orders/?page=n`.
///
/// The walk over all pages stops the first time `next_page` is `null`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OrdersPage {
    /// Total number of orders across all pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Link to the next page, `None` on the last page.
    #[serde(default)]
    pub next_page: Option<String>,
    /// Link to the previous page, `None` on the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<String>,
    /// Orders on this page.
    #[serde(default)]
    pub results: Vec<Order>,
}

impl OrdersPage {
    /// Returns `true` if the server reports another page after this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

/// A past or upcoming order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Order {
    /// Order identifier, used in order-line paths.
    pub id: u64,
    /// Human-readable order reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    /// Fulfilment status as reported by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Scheduled delivery day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    /// When the order was placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Decimal amount, e.g. `"54.20"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<String>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Number of products in the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u32>,
}

/// The prepared lines of `GET customers/{id}/orders/{order_id}/lines/prepared/`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OrderLines {
    /// The order these lines belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    /// Prepared product lines.
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl OrderLines {
    /// Sum of the quantities of every line.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// One product line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OrderLine {
    /// Product identifier.
    pub product_id: u64,
    /// Display name of the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Units prepared.
    pub quantity: u32,
    /// Decimal price of one unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
    /// Decimal price of the whole line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<String>,
}
