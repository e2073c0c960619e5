//! Shared types and models for the Warehouse Order Management System
//!
//! This crate contains the domain types shared between the backend
//! services and any future clients of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
