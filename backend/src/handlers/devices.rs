//! Device record handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::Device;
use shared::types::RecordView;

use crate::error::AppResult;
use crate::AppState;

/// Query parameters for device listing and search
#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    /// Free-text search over identifiers, order ids, school and model
    pub q: Option<String>,
    pub warehouse: Option<String>,
    #[serde(default)]
    pub view: RecordView,
}

/// List or search device records, newest first
pub async fn list_devices(
    State(state): State<AppState>,
    Query(params): Query<DeviceQuery>,
) -> AppResult<Json<Vec<Device>>> {
    let devices = state
        .orders
        .search_devices(params.q.as_deref(), params.warehouse.as_deref(), params.view)
        .await;
    Ok(Json(devices))
}
