//! Sale, sale detail and payment rows.
//!
//! - Sale: id, date, sellerId, customerId, total
//! - Detail: saleId, productId, quantity, salePrice, imei1, imei2, serialNumber
//! - Payment: saleId, method, amount

use serde_json::Value;

use crate::error::Result;
use crate::models::{PaymentAllocation, PaymentDetail, SaleDetail, SaleLineItem, SaleRecord};

use super::{cell, decimal_cell, optional_cell, parse_decimal, parse_int, Cell};

pub const SALE_MIN_CELLS: usize = 5;
pub const DETAIL_MIN_CELLS: usize = 4;
pub const PAYMENT_MIN_CELLS: usize = 3;

pub fn decode_sale_record(row: &[String]) -> Result<SaleRecord> {
    Ok(SaleRecord {
        id: cell(row, 0).to_string(),
        timestamp: cell(row, 1).to_string(),
        seller_id: parse_int(cell(row, 2))?,
        customer_id: parse_int(cell(row, 3))?,
        total: parse_decimal(cell(row, 4))?,
    })
}

pub fn encode_sale_record(record: &SaleRecord) -> Vec<Cell> {
    vec![
        Value::from(record.id.clone()),
        Value::from(record.timestamp.clone()),
        Value::from(record.seller_id),
        Value::from(record.customer_id),
        decimal_cell(record.total),
    ]
}

pub fn decode_sale_detail(row: &[String]) -> Result<SaleDetail> {
    Ok(SaleDetail {
        sale_id: cell(row, 0).to_string(),
        item: SaleLineItem {
            product_id: parse_int(cell(row, 1))?,
            quantity: parse_int(cell(row, 2))?,
            sale_price: parse_decimal(cell(row, 3))?,
            imei1: optional_cell(row, 4),
            imei2: optional_cell(row, 5),
            serial_number: optional_cell(row, 6),
        },
    })
}

pub fn encode_sale_detail(sale_id: &str, item: &SaleLineItem) -> Vec<Cell> {
    let text = |v: &Option<String>| Value::from(v.clone().unwrap_or_default());
    vec![
        Value::from(sale_id),
        Value::from(item.product_id),
        Value::from(item.quantity),
        decimal_cell(item.sale_price),
        text(&item.imei1),
        text(&item.imei2),
        text(&item.serial_number),
    ]
}

pub fn decode_payment_detail(row: &[String]) -> Result<PaymentDetail> {
    Ok(PaymentDetail {
        sale_id: cell(row, 0).to_string(),
        payment: PaymentAllocation {
            method: cell(row, 1).to_string(),
            amount: parse_decimal(cell(row, 2))?,
        },
    })
}

pub fn encode_payment_detail(sale_id: &str, payment: &PaymentAllocation) -> Vec<Cell> {
    vec![
        Value::from(sale_id),
        Value::from(payment.method.clone()),
        decimal_cell(payment.amount),
    ]
}

#[cfg(test)]
#[path = "sale_tests.rs"]
mod tests;
