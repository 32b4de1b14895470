//! Delivery-area (warehouse) selection.

use serde::{Deserialize, Serialize};

/// Body of `PUT postal-codes/actions/change-pc/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarehouseChangeRequest {
    /// Five-digit postal code of the new delivery area.
    pub postal_code: String,
}

/// Result of a postal-code change.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct WarehouseChange {
    /// Postal code now in effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Identifier of the warehouse serving that postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<u64>,
    /// Display name of that warehouse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_name: Option<String>,
    /// `false` when the postal code was already served by the same warehouse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,
}
