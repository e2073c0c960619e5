//! Validation utilities for the Warehouse Order Management System
//!
//! Catalog-backed checks run before any store mutation; field-shape
//! checks live on the request types via `validator`.

use crate::types::{canonical_warehouse, OrderType, Product};

/// Validate and parse an order category
pub fn validate_order_type(value: &str) -> Result<OrderType, &'static str> {
    OrderType::parse(value).ok_or("Unknown order type")
}

/// Validate and parse a product line
pub fn validate_product(value: &str) -> Result<Product, &'static str> {
    Product::parse(value).ok_or("Unknown product")
}

/// Validate a model against the product's known catalog.
/// The match is case-insensitive; the model is stored as supplied.
pub fn validate_model(product: Product, model: &str) -> Result<(), &'static str> {
    let trimmed = model.trim();
    if trimmed.is_empty() {
        return Err("Model is required");
    }
    if product
        .models()
        .iter()
        .any(|m| m.eq_ignore_ascii_case(trimmed))
    {
        Ok(())
    } else {
        Err("Model is not in the product's catalog")
    }
}

/// Validate a warehouse against the fixed catalog, returning the
/// canonical spelling
pub fn validate_warehouse(name: &str) -> Result<&'static str, &'static str> {
    canonical_warehouse(name).ok_or("Warehouse is not in the catalog")
}

/// Validate an order quantity
pub fn validate_quantity(quantity: u32) -> Result<(), &'static str> {
    if quantity == 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a caller-supplied serial number's shape.
/// Uniqueness is checked separately against the device store.
pub fn validate_serial(serial: &str) -> Result<(), &'static str> {
    if serial.trim().is_empty() {
        return Err("Serial number must not be empty");
    }
    Ok(())
}
