//! Product recommendations.

use serde::{Deserialize, Serialize};

/// Body of `GET customers/{id}/recommendations/myregulars/{type}/`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Recommendations {
    /// `"precision"` or `"recall"`, echoed back by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_type: Option<String>,
    /// Recommended products, best match first.
    #[serde(default)]
    pub results: Vec<RecommendedProduct>,
}

/// One recommended product.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RecommendedProduct {
    /// Product identifier.
    pub product_id: u64,
    /// Display name of the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Relevance score; higher is a stronger match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}
