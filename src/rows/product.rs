//! Product rows.
//!
//! Columns: id, kind, name, description, price, stock, brand, model, imei1,
//! imei2, serialNumber, status.

use serde_json::Value;

use crate::error::{PosError, Result};
use crate::models::{Product, ProductKind, RegistrationStatus};

use super::{cell, decimal_cell, optional_cell, parse_decimal, parse_int, Cell};

/// Rows with fewer cells are not products.
pub const MIN_CELLS: usize = 5;

/// Decodes a product row.
pub fn decode_product(row: &[String]) -> Result<Product> {
    let id = parse_int(cell(row, 0))?;
    let kind = ProductKind::from_cell(cell(row, 1))
        .ok_or_else(|| PosError::Decode(format!("unknown product kind '{}'", cell(row, 1))))?;
    let stock = match cell(row, 5).trim() {
        "" => 0,
        value => parse_int(value)?,
    };

    Ok(Product {
        id: Some(id),
        kind,
        name: cell(row, 2).to_string(),
        description: cell(row, 3).to_string(),
        price: parse_decimal(cell(row, 4))?,
        stock,
        brand: optional_cell(row, 6),
        model: optional_cell(row, 7),
        imei1: optional_cell(row, 8),
        imei2: optional_cell(row, 9),
        serial_number: optional_cell(row, 10),
        registration_status: RegistrationStatus::from_cell(cell(row, 11)),
    })
}

/// Encodes a product row. The product must already have an id.
pub fn encode_product(product: &Product) -> Result<Vec<Cell>> {
    let id = product
        .id
        .ok_or_else(|| PosError::Decode(format!("product '{}' has no id", product.name)))?;
    let text = |v: &Option<String>| Value::from(v.clone().unwrap_or_default());

    Ok(vec![
        Value::from(id),
        Value::from(product.kind.as_str()),
        Value::from(product.name.clone()),
        Value::from(product.description.clone()),
        decimal_cell(product.price),
        Value::from(product.stock),
        text(&product.brand),
        text(&product.model),
        text(&product.imei1),
        text(&product.imei2),
        text(&product.serial_number),
        Value::from(product.registration_status.as_str()),
    ])
}

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;
