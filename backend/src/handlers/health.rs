//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;
use shared::types::RecordView;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Active orders currently in the store
    pub active_orders: usize,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_orders = state.orders.all_orders(RecordView::Active).await.len();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_orders,
    })
}
