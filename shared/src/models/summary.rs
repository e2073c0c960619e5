//! Derived stock summary types

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Product, RecordView};

/// Per-warehouse stock summary. Derived on every query, never persisted
/// or cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseSummary {
    pub warehouse: String,
    /// Orders matching the filter, regardless of direction
    pub total_orders: u64,
    /// Device records matching the filter
    pub total_devices: u64,
    /// Units across all matching orders
    pub total_quantity: i64,
    /// Product -> inward unit count
    pub inward_stock: BTreeMap<String, i64>,
    /// Product -> outward unit count
    pub outward_stock: BTreeMap<String, i64>,
    /// Product -> inward minus outward. Deliberately unclamped: a negative
    /// value signals outward movement exceeding recorded inward movement.
    pub available_stock: BTreeMap<String, i64>,
    /// Order category -> order count (orders, not units)
    pub order_types: BTreeMap<String, u64>,
    /// Product -> unit count across all order categories
    pub product_summary: BTreeMap<String, i64>,
    /// Orders created within the trailing 30 days of the query time.
    /// This window is fixed and independent of the date-range filter.
    pub recent_order_count: u64,
    pub updated_at: DateTime<Utc>,
}

impl WarehouseSummary {
    /// An all-zero summary for a warehouse with no matching orders
    pub fn empty(warehouse: &str) -> Self {
        Self {
            warehouse: warehouse.to_string(),
            total_orders: 0,
            total_devices: 0,
            total_quantity: 0,
            inward_stock: BTreeMap::new(),
            outward_stock: BTreeMap::new(),
            available_stock: BTreeMap::new(),
            order_types: BTreeMap::new(),
            product_summary: BTreeMap::new(),
            recent_order_count: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Filter set for stock aggregation queries
#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    /// `None` means all catalog warehouses ("All" selector)
    pub warehouse: Option<String>,
    pub product: Option<Product>,
    pub model: Option<String>,
    /// Inclusive lower bound on the order creation date
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the order creation date
    pub to: Option<NaiveDate>,
    pub view: RecordView,
}
