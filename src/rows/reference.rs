//! Reference data rows: brands, models, customers, users and payment methods.

use serde_json::Value;

use crate::error::{PosError, Result};
use crate::models::{Brand, Customer, Model, PaymentMethod, Role, User};

use super::{cell, parse_int, Cell};

pub const BRAND_MIN_CELLS: usize = 2;
pub const MODEL_MIN_CELLS: usize = 3;
pub const CUSTOMER_MIN_CELLS: usize = 5;
pub const USER_MIN_CELLS: usize = 3;
pub const PAYMENT_METHOD_MIN_CELLS: usize = 2;

/// id, name
pub fn decode_brand(row: &[String]) -> Result<Brand> {
    Ok(Brand {
        id: parse_int(cell(row, 0))?,
        name: cell(row, 1).to_string(),
    })
}

pub fn encode_brand(brand: &Brand) -> Vec<Cell> {
    vec![Value::from(brand.id), Value::from(brand.name.clone())]
}

/// id, brandId, name
pub fn decode_model(row: &[String]) -> Result<Model> {
    Ok(Model {
        id: parse_int(cell(row, 0))?,
        brand_id: parse_int(cell(row, 1))?,
        name: cell(row, 2).to_string(),
    })
}

pub fn encode_model(model: &Model) -> Vec<Cell> {
    vec![
        Value::from(model.id),
        Value::from(model.brand_id),
        Value::from(model.name.clone()),
    ]
}

/// id, fullName, address, dni, phone
pub fn decode_customer(row: &[String]) -> Result<Customer> {
    Ok(Customer {
        id: parse_int(cell(row, 0))?,
        full_name: cell(row, 1).to_string(),
        address: cell(row, 2).to_string(),
        dni: cell(row, 3).to_string(),
        phone: cell(row, 4).to_string(),
    })
}

pub fn encode_customer(customer: &Customer) -> Vec<Cell> {
    vec![
        Value::from(customer.id),
        Value::from(customer.full_name.clone()),
        Value::from(customer.address.clone()),
        Value::from(customer.dni.clone()),
        Value::from(customer.phone.clone()),
    ]
}

/// id, email, role, fullName
pub fn decode_user(row: &[String]) -> Result<User> {
    let role = Role::from_cell(cell(row, 2))
        .ok_or_else(|| PosError::Decode(format!("unknown role '{}'", cell(row, 2))))?;
    Ok(User {
        id: parse_int(cell(row, 0))?,
        email: cell(row, 1).to_string(),
        role,
        full_name: cell(row, 3).to_string(),
    })
}

pub fn encode_user(user: &User) -> Vec<Cell> {
    vec![
        Value::from(user.id),
        Value::from(user.email.clone()),
        Value::from(user.role.as_str()),
        Value::from(user.full_name.clone()),
    ]
}

/// id, name
pub fn decode_payment_method(row: &[String]) -> Result<PaymentMethod> {
    Ok(PaymentMethod {
        id: parse_int(cell(row, 0))?,
        name: cell(row, 1).to_string(),
    })
}

pub fn encode_payment_method(method: &PaymentMethod) -> Vec<Cell> {
    vec![Value::from(method.id), Value::from(method.name.clone())]
}
