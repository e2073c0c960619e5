//! Domain models for the Warehouse Order Management System

mod device;
mod order;
mod summary;

pub use device::*;
pub use order::*;
pub use summary::*;
