//! CSV report generation
//!
//! Reports are rendered in memory and either returned for download or
//! written under the configured export directory. Fields are quoted only
//! when they contain a comma, quote or newline; embedded quotes are
//! doubled; every record, the last included, ends with a line feed.

use chrono::{DateTime, Utc};
use csv::Writer;
use shared::models::{Device, WarehouseSummary};
use tracing::info;

use crate::error::AppResult;

const DEVICE_HEADERS: &[&str] = &[
    "Created At",
    "Order Type",
    "Order ID",
    "Sales Order",
    "Deal ID",
    "Nucleus ID",
    "School Name",
    "Product",
    "Model",
    "Quantity",
    "Device Number",
    "SD Card Size",
    "Profile ID",
    "Location",
    "Warehouse",
];

const SUMMARY_HEADERS: &[&str] = &[
    "Warehouse",
    "Product",
    "Inward Units",
    "Outward Units",
    "Available Units",
    "Orders",
    "Devices",
];

/// CSV export service
#[derive(Clone)]
pub struct ExportService {
    output_dir: String,
}

impl ExportService {
    pub fn new(output_dir: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render device records as CSV, one row per unit
    pub fn export_devices(&self, devices: &[Device]) -> AppResult<String> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(DEVICE_HEADERS).map_err(anyhow::Error::from)?;

        for device in devices {
            writer
                .write_record(&[
                    device.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    device.order_type.as_str().to_string(),
                    device.order_id.clone(),
                    device.sales_order.clone(),
                    device.deal_id.clone(),
                    device.nucleus_id.clone(),
                    device.school_name.clone(),
                    device.product.as_str().to_string(),
                    device.model.clone(),
                    device.quantity.to_string(),
                    device.device_number.clone(),
                    device.sd_card_size.clone().unwrap_or_default(),
                    device.profile_id.clone().unwrap_or_default(),
                    device.location.clone(),
                    device.warehouse.clone(),
                ])
                .map_err(anyhow::Error::from)?;
        }

        finish(writer)
    }

    /// Render warehouse summaries as CSV, one row per warehouse/product
    /// pair with any recorded movement
    pub fn export_summaries(&self, summaries: &[WarehouseSummary]) -> AppResult<String> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(SUMMARY_HEADERS).map_err(anyhow::Error::from)?;

        for summary in summaries {
            for (product, available) in &summary.available_stock {
                let inward = summary.inward_stock.get(product).copied().unwrap_or(0);
                let outward = summary.outward_stock.get(product).copied().unwrap_or(0);
                writer
                    .write_record(&[
                        summary.warehouse.clone(),
                        product.clone(),
                        inward.to_string(),
                        outward.to_string(),
                        available.to_string(),
                        summary.total_orders.to_string(),
                        summary.total_devices.to_string(),
                    ])
                    .map_err(anyhow::Error::from)?;
            }
        }

        finish(writer)
    }

    /// Write a rendered report under the export directory, returning the
    /// full path
    pub async fn write_report(&self, filename: &str, contents: &str) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(anyhow::Error::from)?;
        let path = format!("{}/{}", self.output_dir, filename);
        tokio::fs::write(&path, contents)
            .await
            .map_err(anyhow::Error::from)?;
        info!(%path, "Report written");
        Ok(path)
    }

    /// Filename for a device export taken at `at`,
    /// e.g. "devices_export_20240115_093042.csv"
    pub fn device_export_filename(at: DateTime<Utc>) -> String {
        format!("devices_export_{}.csv", at.format("%Y%m%d_%H%M%S"))
    }

    /// Filename for a warehouse summary export taken at `at`,
    /// e.g. "warehouse-summary-2024-01-15.csv"
    pub fn summary_export_filename(at: DateTime<Utc>) -> String {
        format!("warehouse-summary-{}.csv", at.format("%Y-%m-%d"))
    }
}

fn finish(writer: Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::Error::msg(e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(anyhow::Error::from)
        .map_err(Into::into)
}
