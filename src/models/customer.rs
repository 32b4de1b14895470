//! Customer profile.

use serde::{Deserialize, Serialize};

/// The profile returned by `GET customers/{id}/`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Customer {
    /// Customer identifier.
    pub id: String,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Contact email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone number, as entered by the customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Postal code of the delivery area currently selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Whether the account can place orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Customer {
    /// Returns `"first last"`, or whichever part is present.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_customer_decodes_full_document() {
        let customer: Customer = serde_json::from_value(json!({
            "id": "cust-1234",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone_number": "+31 6 1234 5678",
            "postal_code": "1011",
            "is_active": true
        }))
        .unwrap();

        assert_eq!(customer.id, "cust-1234");
        assert_eq!(customer.email.as_deref(), Some("ada@example.com"));
        assert_eq!(customer.full_name().as_deref(), Some("Ada Lovelace"));
        assert_eq!(customer.is_active, Some(true));
    }

    #[test]
    fn test_customer_null_and_missing_fields() {
        let customer: Customer =
            serde_json::from_value(json!({"id": "cust-1234", "email": null})).unwrap();

        assert!(customer.email.is_none());
        assert!(customer.first_name.is_none());
        assert!(customer.full_name().is_none());

        let serialized = serde_json::to_value(&customer).unwrap();
        assert_eq!(serialized, json!({"id": "cust-1234"}));
    }

    #[test]
    fn test_customer_ignores_unknown_fields() {
        let customer: Customer =
            serde_json::from_value(json!({"id": "abcd", "loyalty_tier": "gold"})).unwrap();
        assert_eq!(customer.id, "abcd");
    }
}
