//! Product API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Category, Product, ProductCreate, Role};
use shared::{AppError, AppResult};

use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive term matched against name, description, seller name
    pub q: Option<String>,
    pub category: Option<Category>,
}

/// GET /api/products - list products, optionally filtered
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.catalog.search(query.q.as_deref(), query.category);
    Ok(Json(products))
}

/// GET /api/products/:id - single product
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    state
        .catalog
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))
}

/// GET /api/products/by-seller/:seller_id - a seller's listings
pub async fn list_by_seller(
    State(state): State<ServerState>,
    Path(seller_id): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog.for_seller(&seller_id)))
}

/// POST /api/products - add a listing for the current seller
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let identity = state.session.current()?.ok_or(AppError::Unauthenticated)?;
    if identity.role != Role::Seller {
        return Err(AppError::forbidden("Only sellers can list products"));
    }

    let product = state.catalog.add(&identity, req)?;
    Ok(Json(product))
}
