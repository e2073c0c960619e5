//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{devices, export, health, orders, warehouses};
use crate::AppState;

/// Build the /api/v1 route tree
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/orders", order_routes())
        .nest("/devices", device_routes())
        .nest("/warehouses", warehouse_routes())
        .nest("/export", export_routes())
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create_order).get(orders::list_orders))
        .route(
            "/:id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/:id/restore", post(orders::restore_order))
}

fn device_routes() -> Router<AppState> {
    Router::new().route("/", get(devices::list_devices))
}

fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(warehouses::list_warehouses))
        .route("/summary", get(warehouses::warehouse_summary))
        .route("/:name/orders", get(warehouses::warehouse_orders))
        .route("/:name/devices", get(warehouses::warehouse_devices))
        .route("/:name/statistics", get(warehouses::warehouse_statistics))
}

fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/devices", get(export::export_devices))
        .route("/warehouse-summary", get(export::export_warehouse_summary))
}
