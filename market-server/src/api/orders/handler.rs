//! Order API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Order, OrderStatus, Role, StatusCounts};
use shared::{AppError, AppResult};

use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub seller_id: Option<String>,
    pub buyer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// GET /api/orders - all orders, or one side's view of them
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = match (query.seller_id, query.buyer_id) {
        (Some(seller_id), _) => state.orders.for_seller(&seller_id)?,
        (None, Some(buyer_id)) => state.orders.for_buyer(&buyer_id)?,
        (None, None) => state.orders.all()?,
    };
    Ok(Json(orders))
}

/// GET /api/orders/:id - single order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get(&id)?))
}

/// POST /api/orders/:id/status - advance an order's status
///
/// Restricted to the seller the order belongs to. Illegal transitions are
/// not an error; the stored order comes back unchanged.
pub async fn advance_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> AppResult<Json<Order>> {
    let identity = state.session.current()?.ok_or(AppError::Unauthenticated)?;
    if identity.role != Role::Seller {
        return Err(AppError::forbidden("Only sellers can update orders"));
    }

    let order = state.orders.get(&id)?;
    if order.seller_id() != Some(identity.id.as_str()) {
        return Err(AppError::forbidden("Order belongs to another seller"));
    }

    let order = state.orders.advance_status(&id, req.status)?;
    Ok(Json(order))
}

/// GET /api/orders/stats/:seller_id - per-status counts for a seller
pub async fn seller_stats(
    State(state): State<ServerState>,
    Path(seller_id): Path<String>,
) -> AppResult<Json<StatusCounts>> {
    Ok(Json(state.orders.counts_for_seller(&seller_id)?))
}
