//! Cart Model

use serde::{Deserialize, Serialize};

use super::Product;

/// A (product, quantity) pair within a cart
///
/// Unique per product id within a cart; adding the same product again
/// increments the quantity instead of creating a second line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Snapshot of the catalog entry at add time
    pub product: Product,
    /// Always >= 1; reducing the quantity to 0 removes the line entirely
    pub quantity: u32,
}

impl LineItem {
    /// Line subtotal, `price * quantity`
    pub fn subtotal(&self) -> f64 {
        self.product.price * self.quantity as f64
    }
}
