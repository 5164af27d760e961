use serde::{Deserialize, Serialize};

/// How a product is tracked in inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductKind {
    /// A single device tracked by IMEI / serial number. Stock is 1 at creation.
    Serialized,
    /// Fungible item tracked only by quantity.
    Generic,
}

impl ProductKind {
    /// Returns the value stored in the kind column ("individual" / "generic")
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Serialized => "individual",
            ProductKind::Generic => "generic",
        }
    }

    /// Parse the kind column value
    pub fn from_cell(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "individual" => Some(ProductKind::Serialized),
            "generic" => Some(ProductKind::Generic),
            _ => None,
        }
    }
}

/// Carrier registration state of a phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Registered,
    #[default]
    Unregistered,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "Registrado",
            RegistrationStatus::Unregistered => "No registrado",
        }
    }

    /// Anything other than "Registrado" reads as unregistered.
    pub fn from_cell(value: &str) -> Self {
        if value.trim() == "Registrado" {
            RegistrationStatus::Registered
        } else {
            RegistrationStatus::Unregistered
        }
    }
}

/// An inventory item.
///
/// `id` is `None` until the store assigns one on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<i64>,
    pub kind: ProductKind,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub imei1: Option<String>,
    pub imei2: Option<String>,
    pub serial_number: Option<String>,
    pub registration_status: RegistrationStatus,
}

impl Product {
    /// A new generic product without an id.
    pub fn generic(name: &str, description: &str, price: f64, stock: i64) -> Self {
        Self {
            id: None,
            kind: ProductKind::Generic,
            name: name.to_string(),
            description: description.to_string(),
            price,
            stock,
            brand: None,
            model: None,
            imei1: None,
            imei2: None,
            serial_number: None,
            registration_status: RegistrationStatus::Unregistered,
        }
    }

    /// A new serialized device without an id. The name is derived from brand and model.
    pub fn serialized(brand: &str, model: &str, description: &str, price: f64) -> Self {
        let product = Self {
            id: None,
            kind: ProductKind::Serialized,
            name: String::new(),
            description: description.to_string(),
            price,
            stock: 1,
            brand: non_empty(brand),
            model: non_empty(model),
            imei1: None,
            imei2: None,
            serial_number: None,
            registration_status: RegistrationStatus::Unregistered,
        };
        crate::inventory::derive_name(product)
    }

    pub fn with_imei1(mut self, imei: &str) -> Self {
        self.imei1 = non_empty(imei);
        self
    }

    pub fn with_imei2(mut self, imei: &str) -> Self {
        self.imei2 = non_empty(imei);
        self
    }

    pub fn with_serial_number(mut self, serial: &str) -> Self {
        self.serial_number = non_empty(serial);
        self
    }

    pub fn is_serialized(&self) -> bool {
        self.kind == ProductKind::Serialized
    }
}

/// A product as read from the store, with the sheet row it lives on.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
    /// 1-based sheet row number (data starts on row 2)
    pub row: usize,
    pub product: Product,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: i64,
    pub brand_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub full_name: String,
    pub address: String,
    pub dni: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Seller,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Seller => "Vendedor",
        }
    }

    pub fn from_cell(value: &str) -> Option<Self> {
        match value.trim() {
            "Admin" => Some(Role::Admin),
            "Vendedor" => Some(Role::Seller),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: i64,
    pub name: String,
}

/// Used when the payment method sheet cannot be read.
pub fn default_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: 1,
            name: "Efectivo".to_string(),
        },
        PaymentMethod {
            id: 2,
            name: "Tarjeta de Crédito".to_string(),
        },
        PaymentMethod {
            id: 3,
            name: "Transferencia".to_string(),
        },
    ]
}

/// One line of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLineItem {
    pub product_id: i64,
    pub quantity: i64,
    pub sale_price: f64,
    pub imei1: Option<String>,
    pub imei2: Option<String>,
    pub serial_number: Option<String>,
}

impl SaleLineItem {
    pub fn new(product_id: i64, quantity: i64, sale_price: f64) -> Self {
        Self {
            product_id,
            quantity,
            sale_price,
            imei1: None,
            imei2: None,
            serial_number: None,
        }
    }
}

/// How much of a sale was paid with which method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub method: String,
    pub amount: f64,
}

/// A finalized sale as submitted by the sales screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalePayload {
    pub seller_id: i64,
    pub customer_id: i64,
    pub total: f64,
    pub items: Vec<SaleLineItem>,
    pub payments: Vec<PaymentAllocation>,
}

/// The header row of a recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: String,
    pub timestamp: String,
    pub seller_id: i64,
    pub customer_id: i64,
    pub total: f64,
}

/// A stored sale detail row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDetail {
    pub sale_id: String,
    pub item: SaleLineItem,
}

/// A stored payment allocation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub sale_id: String,
    pub payment: PaymentAllocation,
}

/// A sale joined with its customer, items and payments.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub record: SaleRecord,
    pub customer: Customer,
    pub items: Vec<EnrichedLineItem>,
    pub payments: Vec<PaymentAllocation>,
}

/// A line item with the product fields needed for display and reports.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedLineItem {
    pub item: SaleLineItem,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub status: String,
}

/// New stock value for one product, targeting its sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockUpdate {
    pub product_id: i64,
    pub row: usize,
    pub new_stock: i64,
}

/// Returns `Some(trimmed)` for non-blank strings.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
