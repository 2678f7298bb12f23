//! Cart engine
//!
//! CRUD over the session's line items plus the one nontrivial rule:
//! split-by-seller checkout. A single checkout with items from two sellers
//! yields two independent orders, each visible only to its seller.
//!
//! # Checkout flow
//!
//! ```text
//! checkout(identity)
//!     ├─ 1. Reject when no identity / empty cart (nothing committed)
//!     ├─ 2. Group line items by seller, insertion order preserved
//!     ├─ 3. Build one pending Order per seller (total fixed here)
//!     ├─ 4. One write transaction: store orders + clear cart
//!     ├─ 5. Commit
//!     └─ 6. Publish OrderCreated per order
//! ```

use shared::models::{Identity, LineItem, Order, OrderStatus, Product};
use shared::util;
use shared::{AppError, AppResult};

use crate::db::MarketStorage;
use crate::orders::OrderBook;

/// Cart engine over persisted line items
#[derive(Debug, Clone)]
pub struct CartEngine {
    storage: MarketStorage,
    orders: OrderBook,
}

impl CartEngine {
    pub fn new(storage: MarketStorage, orders: OrderBook) -> Self {
        Self { storage, orders }
    }

    /// Current line items, in insertion order
    pub fn items(&self) -> AppResult<Vec<LineItem>> {
        Ok(self.storage.load_cart()?)
    }

    /// Add a product to the cart
    ///
    /// Merges into an existing line (quantities are additive) or appends a
    /// new one. A zero quantity is ignored. No stock clamp at this layer;
    /// the payload layer enforces it.
    pub fn add_item(&self, product: Product, quantity: u32) -> AppResult<()> {
        if quantity == 0 {
            return Ok(());
        }

        let mut items = self.storage.load_cart()?;
        match items.iter_mut().find(|i| i.product.id == product.id) {
            Some(line) => line.quantity += quantity,
            None => items.push(LineItem { product, quantity }),
        }
        self.storage.save_cart(&items)?;
        Ok(())
    }

    /// Replace a line's quantity
    ///
    /// Zero removes the line; an unknown product id is a no-op.
    pub fn set_quantity(&self, product_id: &str, quantity: u32) -> AppResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        let mut items = self.storage.load_cart()?;
        if let Some(line) = items.iter_mut().find(|i| i.product.id == product_id) {
            line.quantity = quantity;
            self.storage.save_cart(&items)?;
        }
        Ok(())
    }

    /// Remove a line; absent ids are not an error
    pub fn remove_item(&self, product_id: &str) -> AppResult<()> {
        let mut items = self.storage.load_cart()?;
        let before = items.len();
        items.retain(|i| i.product.id != product_id);
        if items.len() != before {
            self.storage.save_cart(&items)?;
        }
        Ok(())
    }

    /// Empty the cart unconditionally
    pub fn clear(&self) -> AppResult<()> {
        self.storage.save_cart(&[])?;
        Ok(())
    }

    /// Cart total, recomputed fresh on every call
    pub fn total(&self) -> AppResult<f64> {
        let items = self.storage.load_cart()?;
        Ok(util::round2(items.iter().map(LineItem::subtotal).sum()))
    }

    /// Sum of quantities across all lines
    pub fn item_count(&self) -> AppResult<u32> {
        let items = self.storage.load_cart()?;
        Ok(items.iter().map(|i| i.quantity).sum())
    }

    /// Check out the cart for the given identity
    ///
    /// Emits one pending order per distinct seller in the cart and empties
    /// the cart, all in one transaction. On failure nothing is committed:
    /// the cart and the order book stay as they were.
    pub fn checkout(&self, identity: Option<&Identity>) -> AppResult<Vec<Order>> {
        let identity = identity.ok_or(AppError::Unauthenticated)?;

        let items = self.storage.load_cart()?;
        if items.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let created_at = util::now_rfc3339();
        let orders: Vec<Order> = group_by_seller(items)
            .into_iter()
            .map(|(_, seller_items)| {
                let total = util::round2(seller_items.iter().map(LineItem::subtotal).sum());
                Order {
                    id: util::new_id("order"),
                    buyer_id: identity.id.clone(),
                    buyer_name: identity.name.clone(),
                    items: seller_items,
                    total,
                    status: OrderStatus::Pending,
                    created_at: created_at.clone(),
                }
            })
            .collect();

        let txn = self.storage.begin_write()?;
        for order in &orders {
            self.storage.store_order(&txn, order)?;
        }
        self.storage.store_cart(&txn, &[])?;
        txn.commit().map_err(crate::db::StorageError::from)?;

        for order in &orders {
            self.orders.publish_created(order);
        }

        tracing::info!(
            buyer_id = %identity.id,
            order_count = orders.len(),
            "Checkout completed"
        );
        Ok(orders)
    }
}

/// Partition line items by seller id, preserving first-seen seller order
/// and the line order within each group
fn group_by_seller(items: Vec<LineItem>) -> Vec<(String, Vec<LineItem>)> {
    let mut groups: Vec<(String, Vec<LineItem>)> = Vec::new();
    for item in items {
        let seller_id = item.product.seller_id.clone();
        match groups.iter_mut().find(|(id, _)| *id == seller_id) {
            Some((_, group)) => group.push(item),
            None => groups.push((seller_id, vec![item])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Category, Role};

    fn product(id: &str, seller_id: &str, price: f64, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: String::new(),
            price,
            image: String::new(),
            category: Category::Vegetable,
            seller_id: seller_id.to_string(),
            seller_name: format!("Farm {}", seller_id),
            stock,
            unit: "lb".to_string(),
        }
    }

    fn tomatoes() -> Product {
        product("tomatoes", "farmer-1", 2.99, 50)
    }

    fn corn() -> Product {
        product("corn", "farmer-2", 0.99, 100)
    }

    fn buyer() -> Identity {
        Identity {
            id: "buyer-1".to_string(),
            name: "Demo Buyer".to_string(),
            email: "buyer@example.com".to_string(),
            role: Role::Buyer,
        }
    }

    fn engine() -> (CartEngine, OrderBook) {
        let storage = MarketStorage::open_in_memory().unwrap();
        let orders = OrderBook::new(storage.clone());
        (CartEngine::new(storage, orders.clone()), orders)
    }

    #[test]
    fn test_repeated_adds_are_additive() {
        let (cart, _) = engine();

        cart.add_item(tomatoes(), 2).unwrap();
        cart.add_item(tomatoes(), 3).unwrap();
        cart.add_item(tomatoes(), 1).unwrap();

        let items = cart.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 6);
    }

    #[test]
    fn test_add_zero_quantity_is_ignored() {
        let (cart, _) = engine();
        cart.add_item(tomatoes(), 0).unwrap();
        assert!(cart.items().unwrap().is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let (cart, _) = engine();
        cart.add_item(tomatoes(), 2).unwrap();
        cart.add_item(corn(), 3).unwrap();

        cart.set_quantity("tomatoes", 0).unwrap();

        let items = cart.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.id, "corn");
    }

    #[test]
    fn test_set_quantity_replaces_rather_than_adds() {
        let (cart, _) = engine();
        cart.add_item(tomatoes(), 2).unwrap();
        cart.set_quantity("tomatoes", 5).unwrap();
        assert_eq!(cart.items().unwrap()[0].quantity, 5);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let (cart, _) = engine();
        cart.add_item(tomatoes(), 2).unwrap();
        cart.set_quantity("nonexistent", 7).unwrap();

        let items = cart.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_remove_absent_is_not_an_error() {
        let (cart, _) = engine();
        cart.remove_item("nonexistent").unwrap();
        assert!(cart.items().unwrap().is_empty());
    }

    #[test]
    fn test_derived_totals_track_mutations() {
        let (cart, _) = engine();
        assert_eq!(cart.total().unwrap(), 0.0);
        assert_eq!(cart.item_count().unwrap(), 0);

        cart.add_item(tomatoes(), 2).unwrap();
        cart.add_item(corn(), 3).unwrap();
        assert_eq!(cart.total().unwrap(), 8.95);
        assert_eq!(cart.item_count().unwrap(), 5);

        cart.set_quantity("corn", 1).unwrap();
        assert_eq!(cart.total().unwrap(), 6.97);
        assert_eq!(cart.item_count().unwrap(), 3);

        cart.clear().unwrap();
        assert_eq!(cart.total().unwrap(), 0.0);
        assert_eq!(cart.item_count().unwrap(), 0);
    }

    #[test]
    fn test_checkout_splits_by_seller() {
        let (cart, book) = engine();
        cart.add_item(tomatoes(), 2).unwrap();
        cart.add_item(corn(), 3).unwrap();
        let pre_total = cart.total().unwrap();

        let orders = cart.checkout(Some(&buyer())).unwrap();
        assert_eq!(orders.len(), 2);

        let farmer1 = orders
            .iter()
            .find(|o| o.seller_id() == Some("farmer-1"))
            .unwrap();
        assert_eq!(farmer1.total, 5.98);
        assert_eq!(farmer1.items.len(), 1);
        assert_eq!(farmer1.items[0].product.id, "tomatoes");

        let farmer2 = orders
            .iter()
            .find(|o| o.seller_id() == Some("farmer-2"))
            .unwrap();
        assert_eq!(farmer2.total, 2.97);

        // Combined totals equal the pre-checkout derived total
        let combined = util::round2(orders.iter().map(|o| o.total).sum());
        assert_eq!(combined, pre_total);

        // Orders carry buyer attribution and start pending
        assert!(orders
            .iter()
            .all(|o| o.buyer_id == "buyer-1" && o.status == OrderStatus::Pending));

        // Cart is emptied, orders persisted
        assert!(cart.items().unwrap().is_empty());
        assert_eq!(book.all().unwrap().len(), 2);
    }

    #[test]
    fn test_checkout_single_seller_yields_one_order() {
        let (cart, book) = engine();
        cart.add_item(tomatoes(), 1).unwrap();
        cart.add_item(product("spinach", "farmer-1", 3.49, 30), 2)
            .unwrap();

        let orders = cart.checkout(Some(&buyer())).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].items.len(), 2);
        assert_eq!(orders[0].total, util::round2(2.99 + 2.0 * 3.49));
        assert_eq!(book.all().unwrap().len(), 1);
    }

    #[test]
    fn test_checkout_empty_cart_changes_nothing() {
        let (cart, book) = engine();
        let err = cart.checkout(Some(&buyer())).unwrap_err();
        assert!(matches!(err, AppError::EmptyCart));
        assert!(book.all().unwrap().is_empty());
    }

    #[test]
    fn test_checkout_unauthenticated_keeps_cart() {
        let (cart, book) = engine();
        cart.add_item(tomatoes(), 2).unwrap();

        let err = cart.checkout(None).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));

        // Cart unchanged, no orders created
        assert_eq!(cart.items().unwrap().len(), 1);
        assert!(book.all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_pushes_one_event_per_order() {
        let (cart, book) = engine();
        let mut rx = book.subscribe();

        cart.add_item(tomatoes(), 2).unwrap();
        cart.add_item(corn(), 3).unwrap();
        let orders = cart.checkout(Some(&buyer())).unwrap();

        let mut seen = Vec::new();
        for _ in 0..orders.len() {
            match rx.recv().await.unwrap() {
                shared::models::OrderEvent::OrderCreated { order } => seen.push(order.id),
                other => panic!("unexpected event: {:?}", other),
            }
        }
        for order in &orders {
            assert!(seen.contains(&order.id));
        }
    }
}
