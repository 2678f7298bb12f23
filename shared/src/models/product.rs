//! Product Model

use serde::{Deserialize, Serialize};

/// Product category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vegetable,
    Fruit,
}

/// Catalog entry
///
/// Read-only from the cart engine's perspective; supplied by the catalog at
/// startup or created by a seller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price in currency unit (non-negative)
    pub price: f64,
    /// Image reference (URL or asset key)
    pub image: String,
    pub category: Category,
    pub seller_id: String,
    pub seller_name: String,
    /// Units in stock (non-negative)
    pub stock: u32,
    /// Unit label shown next to quantities ("lb", "bunch", ...)
    pub unit: String,
}

/// Create product payload (seller-facing)
///
/// Seller id and name come from the current identity, not the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: Category,
    pub stock: u32,
    pub unit: String,
}
