//! Business logic services

pub mod export;
pub mod identifiers;
pub mod orders;
pub mod warehouse;

pub use export::ExportService;
pub use identifiers::{IdAllocator, SequentialIdAllocator, UuidIdAllocator};
pub use orders::OrderService;
pub use warehouse::StockService;
