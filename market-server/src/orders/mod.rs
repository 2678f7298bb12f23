//! Order book - persisted order records and seller-facing operations
//!
//! Orders are created only by checkout, are never deleted, and change only
//! through [`OrderBook::advance_status`]. Every write publishes an
//! [`OrderEvent`] on a broadcast channel so dashboards get pushed updates
//! instead of polling.

use shared::models::{Order, OrderEvent, OrderStatus, StatusCounts};
use shared::{AppError, AppResult};
use tokio::sync::broadcast;

use crate::db::MarketStorage;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Persisted order book
#[derive(Clone)]
pub struct OrderBook {
    storage: MarketStorage,
    event_tx: broadcast::Sender<OrderEvent>,
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl OrderBook {
    pub fn new(storage: MarketStorage) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { storage, event_tx }
    }

    /// Subscribe to order push notifications
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Publish a creation event for an already-persisted order
    ///
    /// Called by the cart engine after its checkout transaction commits.
    pub(crate) fn publish_created(&self, order: &Order) {
        // Send fails only when nobody subscribes; that is fine.
        let _ = self.event_tx.send(OrderEvent::OrderCreated {
            order: order.clone(),
        });
    }

    /// Get an order by id
    pub fn get(&self, order_id: &str) -> AppResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))
    }

    /// All orders, oldest first
    pub fn all(&self) -> AppResult<Vec<Order>> {
        Ok(self.storage.get_all_orders()?)
    }

    /// Orders visible to a seller (orders whose items belong to the seller)
    pub fn for_seller(&self, seller_id: &str) -> AppResult<Vec<Order>> {
        Ok(self
            .storage
            .get_all_orders()?
            .into_iter()
            .filter(|o| o.seller_id() == Some(seller_id))
            .collect())
    }

    /// Orders placed by a buyer
    pub fn for_buyer(&self, buyer_id: &str) -> AppResult<Vec<Order>> {
        Ok(self
            .storage
            .get_all_orders()?
            .into_iter()
            .filter(|o| o.buyer_id == buyer_id)
            .collect())
    }

    /// Dashboard counts for a seller, grouped by status
    pub fn counts_for_seller(&self, seller_id: &str) -> AppResult<StatusCounts> {
        let mut counts = StatusCounts::default();
        for order in self.for_seller(seller_id)? {
            match order.status {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::Processing => counts.processing += 1,
                OrderStatus::Shipped => counts.shipped += 1,
                OrderStatus::Delivered | OrderStatus::Cancelled => {}
            }
        }
        Ok(counts)
    }

    /// Advance an order's status
    ///
    /// Only `pending -> processing` and `processing -> shipped` mutate the
    /// record; any other requested transition returns the stored order
    /// unchanged. Unknown ids are `NotFound`.
    pub fn advance_status(&self, order_id: &str, target: OrderStatus) -> AppResult<Order> {
        let mut order = self.get(order_id)?;

        if !order.status.can_advance_to(target) {
            tracing::debug!(
                order_id = %order_id,
                from = %order.status,
                to = %target,
                "Ignoring illegal status transition"
            );
            return Ok(order);
        }

        order.status = target;
        self.storage.update_order(&order)?;

        let seller_id = order.seller_id().unwrap_or_default().to_string();
        let _ = self.event_tx.send(OrderEvent::StatusChanged {
            order_id: order.id.clone(),
            seller_id,
            status: target,
        });

        tracing::info!(order_id = %order.id, status = %target, "Order status advanced");
        Ok(order)
    }
}
