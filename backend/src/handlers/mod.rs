//! HTTP request handlers

pub mod devices;
pub mod export;
pub mod health;
pub mod orders;
pub mod warehouses;
