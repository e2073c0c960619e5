//! CSV download handlers
//!
//! Reports are rendered per request from the current store contents and
//! returned inline as attachments; a copy is also written under the
//! configured export directory.

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use chrono::Utc;

use crate::error::AppResult;
use crate::handlers::devices::DeviceQuery;
use crate::handlers::warehouses::SummaryQuery;
use crate::services::ExportService;
use crate::AppState;

/// Download the filtered device records as CSV
pub async fn export_devices(
    State(state): State<AppState>,
    Query(params): Query<DeviceQuery>,
) -> AppResult<impl IntoResponse> {
    let devices = state
        .orders
        .search_devices(params.q.as_deref(), params.warehouse.as_deref(), params.view)
        .await;
    let csv = state.export.export_devices(&devices)?;
    let filename = ExportService::device_export_filename(Utc::now());
    state.export.write_report(&filename, &csv).await?;
    Ok(csv_attachment(filename, csv))
}

/// Download the filtered warehouse summaries as CSV
pub async fn export_warehouse_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter()?;
    let summaries = state.stock.summaries(&filter).await?;
    let csv = state.export.export_summaries(&summaries)?;
    let filename = ExportService::summary_export_filename(Utc::now());
    state.export.write_report(&filename, &csv).await?;
    Ok(csv_attachment(filename, csv))
}

fn csv_attachment(filename: String, body: String) -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/csv".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}
