//! Order management handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::models::{CreateOrderRequest, Order, UpdateOrderRequest};
use shared::types::RecordView;

use crate::error::AppResult;
use crate::AppState;

/// Query parameters for order listing and search
#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    /// Free-text search over ids, references, school, model and serials
    pub q: Option<String>,
    pub warehouse: Option<String>,
    /// "active" (default) or "archived"
    #[serde(default)]
    pub view: RecordView,
}

/// Create an order and its per-unit device records
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.orders.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List or search orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .orders
        .search_orders(params.q.as_deref(), params.warehouse.as_deref(), params.view)
        .await;
    Ok(Json(orders))
}

/// Fetch one order by id, archived included
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get_order(&id).await?;
    Ok(Json(order))
}

/// Overwrite an order's mutable fields
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = state.orders.update_order(&id, request).await?;
    Ok(Json(order))
}

/// Soft-delete an order and its devices
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.delete_order(&id).await?;
    Ok(Json(order))
}

/// Restore a soft-deleted order and its devices
pub async fn restore_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.restore_order(&id).await?;
    Ok(Json(order))
}
