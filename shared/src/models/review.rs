//! Review Model

use serde::{Deserialize, Serialize};

/// Customer review, tied to both a product and the order it came from.
///
/// Customer name is a denormalized snapshot. "One review per order" is a
/// service-layer convention, not a store constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub order_id: String,
    pub customer_name: String,
    /// Star rating, 1-5
    pub rating: u8,
    /// Free text, may be empty
    pub comment: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
}
