//! Sheet ranges. These names and column spans are the persisted schema and
//! must match existing spreadsheets exactly.

/// First sheet row holding data (row 1 is the header).
pub const FIRST_DATA_ROW: usize = 2;

pub const USERS: &str = "Usuarios!A2:D";
pub const USERS_APPEND: &str = "Usuarios!A:D";

pub const PRODUCTS: &str = "Productos!A2:L";
pub const PRODUCTS_APPEND: &str = "Productos!A:L";

pub const CUSTOMERS: &str = "Clientes!A2:E";
pub const CUSTOMERS_APPEND: &str = "Clientes!A:E";

pub const SALES: &str = "Ventas!A2:E";
pub const SALES_APPEND: &str = "Ventas!A:E";

pub const SALE_DETAILS: &str = "Detalle_Venta!A2:G";
pub const SALE_DETAILS_APPEND: &str = "Detalle_Venta!A:G";

pub const PAYMENT_DETAILS: &str = "Detalle_Venta_Metodo_Pago!A2:C";
pub const PAYMENT_DETAILS_APPEND: &str = "Detalle_Venta_Metodo_Pago!A:C";

pub const PAYMENT_METHODS: &str = "Metodos_Pago!A2:B";
pub const PAYMENT_METHODS_APPEND: &str = "Metodos_Pago!A:B";

pub const BRANDS: &str = "Marcas!A2:B";
pub const BRANDS_APPEND: &str = "Marcas!A:B";

pub const MODELS: &str = "Modelos!A2:C";
pub const MODELS_APPEND: &str = "Modelos!A:C";

/// Stock cell (column F) of the product on sheet row `row`.
pub fn product_stock_cell(row: usize) -> String {
    format!("Productos!F{row}")
}

/// Full product row `row`, columns A through L.
pub fn product_row(row: usize) -> String {
    format!("Productos!A{row}:L{row}")
}
