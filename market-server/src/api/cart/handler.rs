//! Cart API handlers
//!
//! Quantity payloads are validated here: the engine itself carries no stock
//! clamp, so requests asking for more than the listed stock are rejected at
//! this layer.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{LineItem, Order, Product};
use shared::{AppError, AppResult};
use validator::Validate;

use crate::core::ServerState;

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub total: f64,
    pub item_count: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddItemRequest {
    pub product_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

fn resolve_product(state: &ServerState, product_id: &str) -> AppResult<Product> {
    state
        .catalog
        .get(product_id)
        .ok_or_else(|| AppError::not_found(format!("Product {}", product_id)))
}

fn check_stock(product: &Product, quantity: u32) -> AppResult<()> {
    if quantity > product.stock {
        return Err(AppError::validation(format!(
            "Only {} x {} in stock",
            product.stock, product.name
        )));
    }
    Ok(())
}

fn view(state: &ServerState) -> AppResult<CartView> {
    Ok(CartView {
        items: state.cart.items()?,
        total: state.cart.total()?,
        item_count: state.cart.item_count()?,
    })
}

/// GET /api/cart - items plus derived totals
pub async fn get_cart(State(state): State<ServerState>) -> AppResult<Json<CartView>> {
    Ok(Json(view(&state)?))
}

/// POST /api/cart/items - add a product to the cart
pub async fn add_item(
    State(state): State<ServerState>,
    Json(req): Json<AddItemRequest>,
) -> AppResult<Json<CartView>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let product = resolve_product(&state, &req.product_id)?;
    check_stock(&product, req.quantity)?;

    state.cart.add_item(product, req.quantity)?;
    Ok(Json(view(&state)?))
}

/// PUT /api/cart/items/:product_id - replace a line's quantity
///
/// A quantity of zero removes the line.
pub async fn set_quantity(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
    Json(req): Json<SetQuantityRequest>,
) -> AppResult<Json<CartView>> {
    if req.quantity > 0 {
        let product = resolve_product(&state, &product_id)?;
        check_stock(&product, req.quantity)?;
    }

    state.cart.set_quantity(&product_id, req.quantity)?;
    Ok(Json(view(&state)?))
}

/// DELETE /api/cart/items/:product_id - remove a line
pub async fn remove_item(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<CartView>> {
    state.cart.remove_item(&product_id)?;
    Ok(Json(view(&state)?))
}

/// DELETE /api/cart - empty the cart
pub async fn clear(State(state): State<ServerState>) -> AppResult<Json<CartView>> {
    state.cart.clear()?;
    Ok(Json(view(&state)?))
}

/// POST /api/cart/checkout - place one order per seller and empty the cart
pub async fn checkout(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let identity = state.session.current()?;
    let orders = state.cart.checkout(identity.as_ref())?;
    Ok(Json(orders))
}
