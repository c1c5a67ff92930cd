use serde::{Deserialize, Serialize};

/// One row of a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    /// Name of the category the product belongs to.
    pub category: String,
    pub price: i64,
}
