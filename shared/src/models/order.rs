//! Order models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{OrderType, Product};

/// A bulk inward/outward movement record for one product/model/warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Allocator-assigned id (e.g. "ORD-000001")
    pub id: String,
    pub order_type: OrderType,
    /// Sales order reference
    pub sales_order: String,
    /// Deal reference id
    pub deal_id: String,
    /// Nucleus reference id
    pub nucleus_id: String,
    /// Customer/school the order is for
    pub school_name: String,
    pub product: Product,
    /// Stored as free text; validated against the product's catalog on intake
    pub model: String,
    pub quantity: u32,
    /// Tablet-only, `None` for TV
    pub sd_card_size: Option<String>,
    /// Tablet-only, `None` for TV
    pub profile_id: Option<String>,
    pub location: String,
    pub warehouse: String,
    /// One identifier per unit; length always equals `quantity`
    pub device_numbers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Number of physical units this order covers. Aggregation counts
    /// identifiers rather than trusting the stored quantity field.
    pub fn unit_count(&self) -> usize {
        self.device_numbers.len()
    }
}

/// Input for creating an order.
///
/// When `serial_numbers` is supplied the identifiers are taken as-is
/// (after validation); otherwise a deterministic set is generated from
/// the order's type, product and model.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Order type is required"))]
    pub order_type: String,
    #[serde(default)]
    pub sales_order: String,
    #[serde(default)]
    pub deal_id: String,
    #[serde(default)]
    pub nucleus_id: String,
    #[serde(default)]
    pub school_name: String,
    #[validate(length(min = 1, message = "Product is required"))]
    pub product: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: u32,
    pub sd_card_size: Option<String>,
    pub profile_id: Option<String>,
    #[serde(default)]
    pub location: String,
    #[validate(length(min = 1, message = "Warehouse is required"))]
    pub warehouse: String,
    pub serial_numbers: Option<Vec<String>>,
}

/// Input for updating an order. Mutable fields are overwritten wholesale;
/// a quantity change discards and regenerates the per-unit identifiers.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, message = "Order type is required"))]
    pub order_type: String,
    #[serde(default)]
    pub sales_order: String,
    #[serde(default)]
    pub deal_id: String,
    #[serde(default)]
    pub nucleus_id: String,
    #[serde(default)]
    pub school_name: String,
    #[validate(length(min = 1, message = "Product is required"))]
    pub product: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: u32,
    pub sd_card_size: Option<String>,
    pub profile_id: Option<String>,
    #[serde(default)]
    pub location: String,
    #[validate(length(min = 1, message = "Warehouse is required"))]
    pub warehouse: String,
    pub serial_numbers: Option<Vec<String>>,
}
