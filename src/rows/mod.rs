//! Row encoding and decoding for every stored entity.
//!
//! Each entity is one spreadsheet row with a fixed column order. Decoders take
//! the cells as strings (the store returns formatted values); encoders produce
//! JSON cells ready for an append or overwrite request.
//!
//! # Module Structure
//!
//! - [`ranges`] - Sheet names and column spans
//! - [`product`] - Product rows
//! - [`sale`] - Sale, sale detail and payment rows
//! - [`reference`] - Brands, models, customers, users, payment methods

pub mod product;
pub mod ranges;
pub mod reference;
pub mod sale;

use log::{debug, warn};
use serde_json::Value;

use crate::error::{PosError, Result};

/// A row as read from the store.
pub type Row = Vec<String>;

/// A cell as sent to the store.
pub type Cell = Value;

pub use product::{decode_product, encode_product};
pub use reference::{
    decode_brand, decode_customer, decode_model, decode_payment_method, decode_user, encode_brand,
    encode_customer, encode_model, encode_payment_method, encode_user,
};
pub use sale::{
    decode_payment_detail, decode_sale_detail, decode_sale_record, encode_payment_detail,
    encode_sale_detail, encode_sale_record,
};

/// Returns cell `index`, or "" when the row is shorter.
///
/// The store drops trailing empty cells, so short rows are normal.
pub(crate) fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// `Some` for non-blank cells.
pub(crate) fn optional_cell(row: &[String], index: usize) -> Option<String> {
    crate::models::non_empty(cell(row, index))
}

/// Parses an integer cell. Accepts a trailing fraction ("12.0") and truncates it.
pub fn parse_int(value: &str) -> Result<i64> {
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    parse_decimal(trimmed)
        .map(|v| v.trunc() as i64)
        .map_err(|_| PosError::Decode(format!("not an integer: '{value}'")))
}

/// Parses a decimal cell, handling both comma and dot decimal separators.
///
/// # Examples
/// - "5,00" -> 5.0
/// - "5.00" -> 5.0
/// - "100" -> 100.0
pub fn parse_decimal(value: &str) -> Result<f64> {
    let clean = value.trim().replace(',', ".");
    clean
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PosError::Decode(format!("not a number: '{value}'")))
}

/// Encodes a decimal, writing whole numbers without a fraction.
pub(crate) fn decimal_cell(value: f64) -> Cell {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Decodes every row of a range, keeping each record's sheet row number.
///
/// Rows shorter than `min_len` are skipped silently; rows that fail to decode
/// are skipped with a warning so one bad row does not hide the rest.
pub fn decode_all<T, F>(rows: &[Row], min_len: usize, decode: F) -> Vec<(usize, T)>
where
    F: Fn(&[String]) -> Result<T>,
{
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let sheet_row = index + ranges::FIRST_DATA_ROW;
        if row.len() < min_len {
            debug!("Skipping short row {sheet_row} ({} cells)", row.len());
            continue;
        }
        match decode(row) {
            Ok(record) => records.push((sheet_row, record)),
            Err(e) => warn!("Skipping row {sheet_row}: {e}"),
        }
    }
    records
}
