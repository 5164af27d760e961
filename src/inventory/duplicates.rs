//! Duplicate detection for products.
//!
//! Serialized devices collide on a shared non-empty IMEI 1 or serial number.
//! Generic products collide on name and description, compared without case.
//! Products of different kinds never collide, and a product never collides
//! with a record carrying its own id.

use log::{debug, warn};

use crate::error::{PosError, Result};
use crate::models::{Product, ProductKind};

/// Why a candidate collides with an existing product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    Imei { existing_id: Option<i64>, imei: String },
    SerialNumber { existing_id: Option<i64>, serial: String },
    NameAndDescription { existing_id: Option<i64>, name: String },
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = |id: &Option<i64>| id.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
        match self {
            Conflict::Imei { existing_id, imei } => {
                write!(f, "IMEI {} already registered on product {}", imei, id(existing_id))
            }
            Conflict::SerialNumber {
                existing_id,
                serial,
            } => write!(
                f,
                "serial number {} already registered on product {}",
                serial,
                id(existing_id)
            ),
            Conflict::NameAndDescription { existing_id, name } => write!(
                f,
                "product '{}' with the same description already exists (id {})",
                name,
                id(existing_id)
            ),
        }
    }
}

/// Trimmed identifier, `None` when blank.
fn identifier(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn same_record(candidate: &Product, other: &Product) -> bool {
    matches!((candidate.id, other.id), (Some(a), Some(b)) if a == b)
}

/// Checks a single pair of products.
pub fn collides(candidate: &Product, other: &Product) -> Option<Conflict> {
    if same_record(candidate, other) {
        return None;
    }

    match (candidate.kind, other.kind) {
        (ProductKind::Serialized, ProductKind::Serialized) => {
            if let Some(imei) = identifier(&candidate.imei1) {
                if identifier(&other.imei1) == Some(imei) {
                    return Some(Conflict::Imei {
                        existing_id: other.id,
                        imei: imei.to_string(),
                    });
                }
            }
            if let Some(serial) = identifier(&candidate.serial_number) {
                if identifier(&other.serial_number) == Some(serial) {
                    return Some(Conflict::SerialNumber {
                        existing_id: other.id,
                        serial: serial.to_string(),
                    });
                }
            }
            None
        }
        (ProductKind::Generic, ProductKind::Generic) => {
            let same_name = candidate.name.to_lowercase() == other.name.to_lowercase();
            let same_description =
                candidate.description.to_lowercase() == other.description.to_lowercase();
            if same_name && same_description {
                Some(Conflict::NameAndDescription {
                    existing_id: other.id,
                    name: other.name.clone(),
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Returns the first conflict between `candidate` and any of `products`.
pub fn find_conflict<'a, I>(candidate: &Product, products: I) -> Option<Conflict>
where
    I: IntoIterator<Item = &'a Product>,
{
    products
        .into_iter()
        .find_map(|other| collides(candidate, other))
}

/// True when `candidate` collides with any of `products`.
pub fn is_duplicate<'a, I>(candidate: &Product, products: I) -> bool
where
    I: IntoIterator<Item = &'a Product>,
{
    find_conflict(candidate, products).is_some()
}

/// Fails with [`PosError::ValidationConflict`] when `candidate` collides with any of `products`.
pub fn validate_no_duplicate<'a, I>(candidate: &Product, products: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Product>,
{
    debug!(
        "Checking '{}' ({}) for duplicates",
        candidate.name,
        candidate.kind.as_str()
    );
    match find_conflict(candidate, products) {
        Some(conflict) => {
            warn!("Duplicate product rejected: {conflict}");
            Err(PosError::ValidationConflict(conflict.to_string()))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "duplicates_tests.rs"]
mod tests;
