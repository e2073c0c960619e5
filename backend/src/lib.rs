//! Warehouse Order Management System backend
//!
//! Tracks bulk inward/outward device orders across a fixed warehouse
//! catalog, expands each order into per-unit device records, derives
//! stock summaries on demand and renders CSV reports.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

use crate::config::Config;
use crate::services::{ExportService, OrderService, SequentialIdAllocator, StockService};

/// Shared application state. Services are cheap to clone; they share the
/// underlying store.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    pub stock: StockService,
    pub export: ExportService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let orders = OrderService::new(Arc::new(SequentialIdAllocator::new()));
        let stock = StockService::new(orders.clone());
        let export = ExportService::new(config.export.output_dir.clone());
        Self {
            orders,
            stock,
            export,
            config: Arc::new(config),
        }
    }
}

/// Build the application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Warehouse Order Management System API"
}
