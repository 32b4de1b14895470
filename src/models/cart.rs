//! Shopping cart and the body used to replace it.

use serde::{Deserialize, Serialize};

/// The cart returned by `GET`/`PUT customers/{id}/cart/`.
///
/// `version` increases with every change; a replacement must send the
/// version it was based on.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Cart {
    /// Revision counter; send it back with the next replacement.
    pub version: u64,
    /// Products currently in the cart.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Decimal total of all items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<String>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Cart {
    /// Returns `true` if the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Builds an update that keeps this cart's version and contents.
    #[must_use]
    pub fn to_update(&self) -> CartUpdate {
        CartUpdate {
            version: self.version,
            items: self
                .items
                .iter()
                .map(|item| CartItemUpdate {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// One product in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CartItem {
    /// Product identifier.
    pub product_id: u64,
    /// Display name of the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Units in the cart.
    pub quantity: u32,
    /// Decimal price of one unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
}

/// Body of `PUT customers/{id}/cart/`. Empty `items` clears the cart.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CartUpdate {
    /// Version of the cart this update was based on.
    pub version: u64,
    /// The complete new contents; empty clears the cart.
    pub items: Vec<CartItemUpdate>,
}

impl CartUpdate {
    /// An update removing every item.
    #[must_use]
    pub const fn clear(version: u64) -> Self {
        Self {
            version,
            items: Vec::new(),
        }
    }

    /// Sets the quantity for `product_id`, adding or removing the line.
    ///
    /// A quantity of zero removes the product.
    #[must_use]
    pub fn set_quantity(mut self, product_id: u64, quantity: u32) -> Self {
        self.items.retain(|item| item.product_id != product_id);
        if quantity > 0 {
            self.items.push(CartItemUpdate {
                product_id,
                quantity,
            });
        }
        self
    }
}

/// One line of a [`CartUpdate`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CartItemUpdate {
    /// Product identifier.
    pub product_id: u64,
    /// Units wanted; must be at least 1.
    pub quantity: u32,
}
