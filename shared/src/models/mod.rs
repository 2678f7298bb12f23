//! Domain models
//!
//! Plain serde types shared between the server and its clients.

mod cart;
mod identity;
mod order;
mod product;

pub use cart::LineItem;
pub use identity::{Identity, Role};
pub use order::{Order, OrderEvent, OrderStatus, StatusCounts};
pub use product::{Category, Product, ProductCreate};
