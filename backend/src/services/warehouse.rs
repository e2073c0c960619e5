//! Stock aggregation over the order store
//!
//! Summaries are derived from the matching orders on every call; nothing
//! here is cached or persisted. Unit counts come from the per-unit
//! identifier lists, not the stored quantity field.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use shared::models::{Order, StockFilter, WarehouseSummary};
use shared::types::{canonical_warehouse, Movement, WAREHOUSES};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::orders::OrderService;

/// Orders created within this trailing window count as recent. The window
/// is anchored at the query time and ignores the filter's date range.
const RECENT_WINDOW_DAYS: i64 = 30;

/// Warehouse stock aggregation service
#[derive(Clone)]
pub struct StockService {
    orders: OrderService,
}

impl StockService {
    pub fn new(orders: OrderService) -> Self {
        Self { orders }
    }

    /// Summaries for every warehouse in the filter's scope.
    ///
    /// A filter naming one warehouse yields a single summary; otherwise
    /// the whole catalog is covered, and warehouses with no matching
    /// orders appear as all-zero summaries rather than being dropped.
    pub async fn summaries(&self, filter: &StockFilter) -> AppResult<Vec<WarehouseSummary>> {
        let scope: Vec<&'static str> = match filter.warehouse.as_deref() {
            Some(name) => {
                let canonical = canonical_warehouse(name)
                    .ok_or_else(|| AppError::validation("warehouse", "Warehouse is not in the catalog"))?;
                vec![canonical]
            }
            None => WAREHOUSES.to_vec(),
        };

        let orders = self.orders.filter_orders(filter).await;
        let devices = self.orders.filter_devices(filter).await;

        // The recent window is anchored at now and ignores the filter's
        // date range, so it is computed from an undated variant.
        let recent_cutoff = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let recent_orders = if filter.from.is_some() || filter.to.is_some() {
            let undated = StockFilter {
                from: None,
                to: None,
                ..filter.clone()
            };
            self.orders.filter_orders(&undated).await
        } else {
            orders.clone()
        };

        let summaries = scope
            .into_iter()
            .map(|warehouse| {
                let matching: Vec<&Order> = orders
                    .iter()
                    .filter(|o| o.warehouse == warehouse)
                    .collect();
                let device_count = devices
                    .iter()
                    .filter(|d| d.warehouse == warehouse)
                    .count() as u64;
                let recent = recent_orders
                    .iter()
                    .filter(|o| o.warehouse == warehouse && o.created_at >= recent_cutoff)
                    .count() as u64;
                summarize(warehouse, &matching, device_count, recent)
            })
            .collect();

        debug!(?filter.warehouse, "Stock summaries computed");
        Ok(summaries)
    }

    /// Summary for a single warehouse over all active records
    pub async fn statistics(&self, warehouse: &str) -> AppResult<WarehouseSummary> {
        let filter = StockFilter {
            warehouse: Some(warehouse.to_string()),
            ..StockFilter::default()
        };
        let mut summaries = self.summaries(&filter).await?;
        summaries
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Warehouse '{}'", warehouse)))
    }
}

fn summarize(
    warehouse: &str,
    orders: &[&Order],
    device_count: u64,
    recent_order_count: u64,
) -> WarehouseSummary {
    let mut summary = WarehouseSummary::empty(warehouse);
    summary.total_orders = orders.len() as u64;
    summary.total_devices = device_count;
    summary.recent_order_count = recent_order_count;

    for order in orders {
        let units = order.unit_count() as i64;
        let product = order.product.as_str().to_string();

        summary.total_quantity += units;
        *summary.product_summary.entry(product.clone()).or_insert(0) += units;
        *summary
            .order_types
            .entry(order.order_type.as_str().to_string())
            .or_insert(0) += 1;

        match order.order_type.movement() {
            Movement::Inward => {
                *summary.inward_stock.entry(product.clone()).or_insert(0) += units
            }
            Movement::Outward => {
                *summary.outward_stock.entry(product.clone()).or_insert(0) += units
            }
        }
    }

    // Available = inward minus outward, per product, deliberately unclamped
    let mut available: BTreeMap<String, i64> = BTreeMap::new();
    for (product, units) in &summary.inward_stock {
        *available.entry(product.clone()).or_insert(0) += units;
    }
    for (product, units) in &summary.outward_stock {
        *available.entry(product.clone()).or_insert(0) -= units;
    }
    summary.available_stock = available;

    summary
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared::models::CreateOrderRequest;
    use shared::types::{Product, RecordView};

    use super::*;
    use crate::services::identifiers::SequentialIdAllocator;

    fn services() -> (OrderService, StockService) {
        let orders = OrderService::new(Arc::new(SequentialIdAllocator::new()));
        let stock = StockService::new(orders.clone());
        (orders, stock)
    }

    fn request(order_type: &str, product: &str, model: &str, warehouse: &str, quantity: u32) -> CreateOrderRequest {
        CreateOrderRequest {
            order_type: order_type.to_string(),
            sales_order: String::new(),
            deal_id: String::new(),
            nucleus_id: String::new(),
            school_name: "Test School".to_string(),
            product: product.to_string(),
            model: model.to_string(),
            quantity,
            sd_card_size: None,
            profile_id: None,
            location: String::new(),
            warehouse: warehouse.to_string(),
            serial_numbers: None,
        }
    }

    async fn seed(orders: &OrderService) {
        orders
            .create_order(request("New", "Tablet", "TB301FU", "Trichy", 10))
            .await
            .unwrap();
        orders
            .create_order(request("Refurbish", "Tablet", "TB301FU", "Trichy", 5))
            .await
            .unwrap();
        orders
            .create_order(request("Replace", "Tablet", "TB301FU", "Trichy", 4))
            .await
            .unwrap();
        orders
            .create_order(request("Replace", "TV", "Xentec X32S", "Trichy", 2))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_summary_inward_outward_available() {
        let (orders, stock) = services();
        seed(&orders).await;

        let summary = stock.statistics("Trichy").await.unwrap();
        assert_eq!(summary.total_orders, 4);
        assert_eq!(summary.total_devices, 21);
        assert_eq!(summary.total_quantity, 21);
        assert_eq!(summary.inward_stock.get("Tablet"), Some(&15));
        assert_eq!(summary.outward_stock.get("Tablet"), Some(&4));
        assert_eq!(summary.available_stock.get("Tablet"), Some(&11));
        assert_eq!(summary.order_types.get("New"), Some(&1));
        assert_eq!(summary.order_types.get("Replace"), Some(&2));
        assert_eq!(summary.recent_order_count, 4);
    }

    #[tokio::test]
    async fn test_available_goes_negative_without_inward() {
        let (orders, stock) = services();
        orders
            .create_order(request("Replace", "TV", "Xentec X32S", "Jaipur", 3))
            .await
            .unwrap();

        let summary = stock.statistics("Jaipur").await.unwrap();
        assert_eq!(summary.inward_stock.get("TV"), None);
        assert_eq!(summary.outward_stock.get("TV"), Some(&3));
        assert_eq!(summary.available_stock.get("TV"), Some(&-3));
    }

    #[tokio::test]
    async fn test_summaries_cover_whole_catalog_with_zero_rows() {
        let (orders, stock) = services();
        seed(&orders).await;

        let summaries = stock.summaries(&StockFilter::default()).await.unwrap();
        assert_eq!(summaries.len(), WAREHOUSES.len());
        let jaipur = summaries.iter().find(|s| s.warehouse == "Jaipur").unwrap();
        assert_eq!(jaipur.total_orders, 0);
        assert!(jaipur.available_stock.is_empty());
    }

    #[tokio::test]
    async fn test_summaries_are_idempotent() {
        let (orders, stock) = services();
        seed(&orders).await;

        let first = stock.statistics("Trichy").await.unwrap();
        let second = stock.statistics("Trichy").await.unwrap();
        assert_eq!(first.available_stock, second.available_stock);
        assert_eq!(first.total_quantity, second.total_quantity);
        assert_eq!(first.order_types, second.order_types);
    }

    #[tokio::test]
    async fn test_deleted_orders_leave_active_totals() {
        let (orders, stock) = services();
        let order = orders
            .create_order(request("New", "Tablet", "TB301FU", "Trichy", 10))
            .await
            .unwrap();
        orders.delete_order(&order.id).await.unwrap();

        let active = stock.statistics("Trichy").await.unwrap();
        assert_eq!(active.total_orders, 0);
        assert_eq!(active.available_stock.get("Tablet"), None);

        let archived_filter = StockFilter {
            warehouse: Some("Trichy".to_string()),
            view: RecordView::Archived,
            ..StockFilter::default()
        };
        let archived = stock.summaries(&archived_filter).await.unwrap();
        assert_eq!(archived[0].total_orders, 1);
        assert_eq!(archived[0].inward_stock.get("Tablet"), Some(&10));
    }

    #[tokio::test]
    async fn test_product_filter_narrows_summary() {
        let (orders, stock) = services();
        seed(&orders).await;

        let filter = StockFilter {
            warehouse: Some("Trichy".to_string()),
            product: Some(Product::Tv),
            ..StockFilter::default()
        };
        let summaries = stock.summaries(&filter).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_orders, 1);
        assert_eq!(summaries[0].outward_stock.get("TV"), Some(&2));
        assert_eq!(summaries[0].inward_stock.get("Tablet"), None);
    }

    #[tokio::test]
    async fn test_unknown_warehouse_filter_is_rejected() {
        let (_, stock) = services();
        let filter = StockFilter {
            warehouse: Some("Atlantis".to_string()),
            ..StockFilter::default()
        };
        assert!(stock.summaries(&filter).await.is_err());
    }
}
