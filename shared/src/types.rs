//! Common types and fixed catalogs used across the platform

use serde::{Deserialize, Serialize};

/// Stock movement direction derived from an order's business category.
///
/// Inward movement increases available stock at a warehouse, outward
/// movement decreases it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Inward,
    Outward,
}

impl std::fmt::Display for Movement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Movement::Inward => write!(f, "Inward"),
            Movement::Outward => write!(f, "Outward"),
        }
    }
}

/// Business order categories.
///
/// The direction names "inward" and "outward" are accepted on input as
/// aliases for the default category of that direction (inward -> New,
/// outward -> Replace).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    New,
    Refurbish,
    Replace,
}

impl OrderType {
    /// Parse a category case-insensitively. Unknown values are rejected
    /// by returning `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "new" | "inward" => Some(OrderType::New),
            "refurbish" => Some(OrderType::Refurbish),
            "replace" | "outward" => Some(OrderType::Replace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::New => "New",
            OrderType::Refurbish => "Refurbish",
            OrderType::Replace => "Replace",
        }
    }

    /// Map the category to its stock movement direction.
    pub fn movement(&self) -> Movement {
        match self {
            OrderType::New | OrderType::Refurbish => Movement::Inward,
            OrderType::Replace => Movement::Outward,
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Product lines tracked by the system
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Tablet,
    Tv,
}

impl Product {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "tablet" => Some(Product::Tablet),
            "tv" | "television" => Some(Product::Tv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Tablet => "Tablet",
            Product::Tv => "TV",
        }
    }

    /// Known model catalog for this product
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            Product::Tablet => TABLET_MODELS,
            Product::Tv => TV_MODELS,
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-unit device lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Available,
    Assigned,
    Maintenance,
}

impl DeviceStatus {
    /// Default status for a freshly created unit: inward stock arrives
    /// available, outward stock leaves assigned.
    pub fn default_for(movement: Movement) -> Self {
        match movement {
            Movement::Inward => DeviceStatus::Available,
            Movement::Outward => DeviceStatus::Assigned,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Available => "Available",
            DeviceStatus::Assigned => "Assigned",
            DeviceStatus::Maintenance => "Maintenance",
        }
    }
}

/// Which records a read operation sees.
///
/// `Active` excludes soft-deleted records; `Archived` shows only
/// soft-deleted records. The two views are disjoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordView {
    #[default]
    Active,
    Archived,
}

impl RecordView {
    /// True when a record with the given deletion flag belongs to this view
    pub fn includes(&self, is_deleted: bool) -> bool {
        match self {
            RecordView::Active => !is_deleted,
            RecordView::Archived => is_deleted,
        }
    }
}

/// Fixed warehouse catalog. This is the canonical location option set;
/// filtering and summary scope expansion both run over this list rather
/// than the warehouses observed in stored orders.
pub const WAREHOUSES: &[&str] = &[
    "Trichy",
    "Bangalore",
    "Hyderabad",
    "Kolkata",
    "Bhiwandi",
    "Ghaziabad",
    "Zirakpur",
    "Indore",
    "Jaipur",
];

/// Synthetic selector representing the union of all warehouses
pub const ALL_WAREHOUSES: &str = "All";

/// Known tablet models
pub const TABLET_MODELS: &[&str] = &[
    "TB301FU",
    "TB301FX/XU",
    "TB-8505F",
    "TB-7306F",
    "TB-7306X",
    "TB-7305X",
];

/// Known TV models
pub const TV_MODELS: &[&str] = &[
    "Hyundai HY3285HM36",
    "Hyundai HY4385HM36",
    "Hyundai HY5585HM36",
    "Xentec X32S",
    "Xentec X43F",
];

/// Look up the canonical spelling of a warehouse name, case-insensitively
pub fn canonical_warehouse(name: &str) -> Option<&'static str> {
    let trimmed = name.trim();
    WAREHOUSES
        .iter()
        .find(|w| w.eq_ignore_ascii_case(trimmed))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_parse_aliases() {
        assert_eq!(OrderType::parse("New"), Some(OrderType::New));
        assert_eq!(OrderType::parse("INWARD"), Some(OrderType::New));
        assert_eq!(OrderType::parse("outward"), Some(OrderType::Replace));
        assert_eq!(OrderType::parse(" refurbish "), Some(OrderType::Refurbish));
        assert_eq!(OrderType::parse("bogus"), None);
    }

    #[test]
    fn test_order_type_movement() {
        assert_eq!(OrderType::New.movement(), Movement::Inward);
        assert_eq!(OrderType::Refurbish.movement(), Movement::Inward);
        assert_eq!(OrderType::Replace.movement(), Movement::Outward);
    }

    #[test]
    fn test_product_models() {
        assert!(Product::Tablet.models().contains(&"TB301FU"));
        assert!(Product::Tv.models().contains(&"Xentec X32S"));
        assert_eq!(Product::Tv.as_str(), "TV");
    }

    #[test]
    fn test_device_status_defaults() {
        assert_eq!(
            DeviceStatus::default_for(Movement::Inward),
            DeviceStatus::Available
        );
        assert_eq!(
            DeviceStatus::default_for(Movement::Outward),
            DeviceStatus::Assigned
        );
    }

    #[test]
    fn test_record_view() {
        assert!(RecordView::Active.includes(false));
        assert!(!RecordView::Active.includes(true));
        assert!(RecordView::Archived.includes(true));
        assert!(!RecordView::Archived.includes(false));
    }

    #[test]
    fn test_canonical_warehouse() {
        assert_eq!(canonical_warehouse("trichy"), Some("Trichy"));
        assert_eq!(canonical_warehouse(" BANGALORE "), Some("Bangalore"));
        assert_eq!(canonical_warehouse("Atlantis"), None);
    }
}
