//! Order Model

use serde::{Deserialize, Serialize};

use super::LineItem;

/// Order status
///
/// Moves only forward: `Pending -> Processing -> Shipped`. `Delivered` and
/// `Cancelled` are modeled for completeness but no operation reaches them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether `target` is a legal forward transition from `self`
    pub fn can_advance_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Processing) | (Self::Processing, Self::Shipped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity
///
/// Created at checkout, one per distinct seller in the cart. Immutable except
/// for `status`; `total` is fixed at creation and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub buyer_id: String,
    pub buyer_name: String,
    /// Line items, all from one seller
    pub items: Vec<LineItem>,
    /// Total in currency unit, `sum(price * quantity)` at creation time
    pub total: f64,
    pub status: OrderStatus,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl Order {
    /// Seller id shared by every line item of this order
    pub fn seller_id(&self) -> Option<&str> {
        self.items.first().map(|item| item.product.seller_id.as_str())
    }
}

/// Per-seller order counts by status (dashboard summary)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub shipped: usize,
}

/// Order push notifications, broadcast on every write
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A checkout produced this order
    OrderCreated { order: Order },
    /// A seller advanced the order's status
    StatusChanged {
        order_id: String,
        seller_id: String,
        status: OrderStatus,
    },
}
