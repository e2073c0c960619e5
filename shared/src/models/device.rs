//! Device models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Order;
use crate::types::{DeviceStatus, OrderType, Product};

/// One physical unit derived from an order.
///
/// Devices carry a weak back-reference to their order by id and copies of
/// its descriptive fields, so they remain useful as archive records on
/// their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Globally unique serial/device number
    pub device_number: String,
    pub order_id: String,
    pub order_type: OrderType,
    pub sales_order: String,
    pub deal_id: String,
    pub nucleus_id: String,
    pub school_name: String,
    pub product: Product,
    pub model: String,
    pub quantity: u32,
    pub sd_card_size: Option<String>,
    pub profile_id: Option<String>,
    pub location: String,
    pub warehouse: String,
    pub status: DeviceStatus,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Device {
    /// Create a unit record mirroring the order's fields at creation time
    pub fn from_order(order: &Order, device_number: String) -> Self {
        Self {
            device_number,
            order_id: order.id.clone(),
            order_type: order.order_type,
            sales_order: order.sales_order.clone(),
            deal_id: order.deal_id.clone(),
            nucleus_id: order.nucleus_id.clone(),
            school_name: order.school_name.clone(),
            product: order.product,
            model: order.model.clone(),
            quantity: order.quantity,
            sd_card_size: order.sd_card_size.clone(),
            profile_id: order.profile_id.clone(),
            location: order.location.clone(),
            warehouse: order.warehouse.clone(),
            status: DeviceStatus::default_for(order.order_type.movement()),
            created_at: order.created_at,
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Refresh the descriptive fields copied from the owning order.
    /// The identifier, status and timestamps are left untouched.
    pub fn sync_from_order(&mut self, order: &Order) {
        self.order_type = order.order_type;
        self.sales_order = order.sales_order.clone();
        self.deal_id = order.deal_id.clone();
        self.nucleus_id = order.nucleus_id.clone();
        self.school_name = order.school_name.clone();
        self.product = order.product;
        self.model = order.model.clone();
        self.quantity = order.quantity;
        self.sd_card_size = order.sd_card_size.clone();
        self.profile_id = order.profile_id.clone();
        self.location = order.location.clone();
        self.warehouse = order.warehouse.clone();
    }
}
