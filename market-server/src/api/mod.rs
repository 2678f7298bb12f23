//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - signup / login / logout / current identity
//! - [`products`] - catalog browsing and seller listings
//! - [`cart`] - cart mutations and checkout
//! - [`orders`] - order queries and status advancement

pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;

use axum::Router;

use crate::core::ServerState;

/// Assemble the full API router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(orders::router())
        .with_state(state)
}
