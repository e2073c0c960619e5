//! Per-unit identifier generation and validation
//!
//! A bulk order expands into one identifier per unit, either synthesized
//! deterministically from the order's type/product/model or supplied by
//! the caller and checked for shape and uniqueness.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use shared::validation::validate_serial;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Short code for an order category, used as the identifier prefix.
/// Unrecognized categories fall back to the generic "ORD" code.
pub fn type_code(order_type: &str) -> &'static str {
    match order_type.trim().to_lowercase().as_str() {
        "new" | "inward" => "NEW",
        "refurbish" => "REF",
        "replace" | "outward" => "RPL",
        _ => "ORD",
    }
}

/// Build the identifier prefix for an order, e.g. "NEW-TABTB-".
///
/// Product contributes its first three characters upper-cased, the model
/// its first two; shorter values contribute what they have.
pub fn device_prefix(order_type: &str, product: &str, model: &str) -> String {
    let product_abbrev: String = product.chars().take(3).collect::<String>().to_uppercase();
    let model_abbrev: String = model.chars().take(2).collect::<String>().to_uppercase();
    format!("{}-{}{}-", type_code(order_type), product_abbrev, model_abbrev)
}

/// Synthesize `quantity` identifiers under `prefix`.
///
/// Numbering is 1-based and zero-padded to four digits; the padding grows
/// naturally past 9999. Candidate numbers already present in `taken` are
/// skipped so that two orders sharing a prefix never collide.
pub fn generate_serials(prefix: &str, quantity: u32, taken: &HashSet<String>) -> Vec<String> {
    let mut serials = Vec::with_capacity(quantity as usize);
    let mut sequence: u64 = 1;
    while serials.len() < quantity as usize {
        let candidate = format!("{}{:04}", prefix, sequence);
        if !taken.contains(&candidate) {
            serials.push(candidate);
        }
        sequence += 1;
    }
    serials
}

/// Validate caller-supplied serial numbers.
///
/// Each value is trimmed, must be non-empty, must not repeat within the
/// order, and must not collide (case-sensitive exact match) with an
/// identifier in `taken`. The list length must equal `quantity`.
pub fn validate_serials(
    supplied: &[String],
    quantity: u32,
    taken: &HashSet<String>,
) -> AppResult<Vec<String>> {
    if supplied.len() != quantity as usize {
        return Err(AppError::validation(
            "serial_numbers",
            format!(
                "Expected {} serial numbers, got {}",
                quantity,
                supplied.len()
            ),
        ));
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(supplied.len());
    let mut serials = Vec::with_capacity(supplied.len());
    for raw in supplied {
        let trimmed = raw.trim();
        validate_serial(trimmed).map_err(|msg| AppError::validation("serial_numbers", msg))?;
        if !seen.insert(trimmed) || taken.contains(trimmed) {
            return Err(AppError::DuplicateIdentifier(trimmed.to_string()));
        }
        serials.push(trimmed.to_string());
    }
    Ok(serials)
}

/// Order id allocation seam. Injected into the order service so store
/// instances can be tested independently, replacing the original's
/// process-global counter.
pub trait IdAllocator: Send + Sync {
    fn next_order_id(&self) -> String;
}

/// Monotonic allocator producing ids like "ORD-000001"
pub struct SequentialIdAllocator {
    counter: AtomicU64,
}

impl SequentialIdAllocator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for SequentialIdAllocator {
    fn next_order_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("ORD-{:06}", n)
    }
}

/// Random allocator for deployments where multiple store instances share
/// an id space
pub struct UuidIdAllocator;

impl IdAllocator for UuidIdAllocator {
    fn next_order_id(&self) -> String {
        format!("ORD-{}", Uuid::new_v4())
    }
}
