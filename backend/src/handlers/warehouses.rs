//! Warehouse catalog and stock summary handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{Device, Order, StockFilter, WarehouseSummary};
use shared::types::{Product, RecordView, ALL_WAREHOUSES};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Query parameters for stock summaries
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// A catalog warehouse, or "All" for the whole catalog
    pub warehouse: Option<String>,
    pub product: Option<String>,
    pub model: Option<String>,
    /// Inclusive creation-date bounds (YYYY-MM-DD)
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub view: RecordView,
}

impl SummaryQuery {
    pub fn into_filter(self) -> AppResult<StockFilter> {
        let product = match self.product.as_deref() {
            Some(value) => Some(
                Product::parse(value)
                    .ok_or_else(|| AppError::validation("product", "Unknown product"))?,
            ),
            None => None,
        };
        // "All" widens the scope to the whole catalog
        let warehouse = self
            .warehouse
            .filter(|w| !w.trim().eq_ignore_ascii_case(ALL_WAREHOUSES));
        Ok(StockFilter {
            warehouse,
            product,
            model: self.model,
            from: self.from,
            to: self.to,
            view: self.view,
        })
    }
}

/// The fixed warehouse catalog
pub async fn list_warehouses(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.orders.warehouse_catalog().to_vec())
}

/// Stock summaries for the filtered scope
pub async fn warehouse_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryQuery>,
) -> AppResult<Json<Vec<WarehouseSummary>>> {
    let filter = params.into_filter()?;
    let summaries = state.stock.summaries(&filter).await?;
    Ok(Json(summaries))
}

/// Orders placed against one warehouse
pub async fn warehouse_orders(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .orders
        .orders_by_warehouse(&name, RecordView::Active)
        .await;
    Ok(Json(orders))
}

/// Device records held at one warehouse
pub async fn warehouse_devices(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<Device>>> {
    let devices = state
        .orders
        .devices_by_warehouse(&name, RecordView::Active)
        .await;
    Ok(Json(devices))
}

/// Full statistics for one warehouse
pub async fn warehouse_statistics(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<WarehouseSummary>> {
    let summary = state.stock.statistics(&name).await?;
    Ok(Json(summary))
}
