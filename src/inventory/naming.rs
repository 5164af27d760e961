//! Display names for serialized devices.

use crate::models::Product;

/// Builds `"<brand> <model>"`, trimmed. Missing parts count as empty.
pub fn compose_name(brand: Option<&str>, model: Option<&str>) -> String {
    format!("{} {}", brand.unwrap_or(""), model.unwrap_or(""))
        .trim()
        .to_string()
}

/// Recomputes the name of a serialized product from its brand and model.
///
/// Generic products are returned unchanged; their name is always free text.
pub fn derive_name(mut product: Product) -> Product {
    if product.is_serialized() {
        product.name = compose_name(product.brand.as_deref(), product.model.as_deref());
    }
    product
}
