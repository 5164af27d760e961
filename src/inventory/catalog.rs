//! Brand/model selection and product form state.

use log::debug;

use crate::models::{non_empty, Brand, Model, Product, ProductKind, RegistrationStatus};

use super::naming::derive_name;

/// Models belonging to the brand named `brand_name`.
///
/// Returns nothing when no brand is selected or the name matches no brand.
pub fn models_for_brand<'a>(
    brand_name: Option<&str>,
    brands: &[Brand],
    models: &'a [Model],
) -> Vec<&'a Model> {
    let Some(name) = brand_name.filter(|n| !n.is_empty()) else {
        return Vec::new();
    };
    match brands.iter().find(|b| b.name == name) {
        Some(brand) => models.iter().filter(|m| m.brand_id == brand.id).collect(),
        None => {
            debug!("Brand '{name}' not found, no model choices");
            Vec::new()
        }
    }
}

/// What happens to the chosen model when the brand changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelPolicy {
    /// Keep the previous model value; it may no longer belong to the brand.
    #[default]
    KeepStale,
    /// Drop the model whenever a different brand is picked.
    ClearOnBrandChange,
}

/// In-progress product being entered or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    product: Product,
    policy: ModelPolicy,
}

impl ProductDraft {
    /// Empty draft for a new product.
    pub fn new(kind: ProductKind) -> Self {
        let mut product = Product::generic("", "", 0.0, 0);
        product.kind = kind;
        Self {
            product,
            policy: ModelPolicy::default(),
        }
    }

    /// Draft for editing an existing product.
    pub fn edit(product: Product) -> Self {
        Self {
            product,
            policy: ModelPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ModelPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Switching to serialized derives the name if brand and model are already set.
    pub fn set_kind(&mut self, kind: ProductKind) {
        self.product.kind = kind;
        if kind == ProductKind::Serialized
            && self.product.brand.is_some()
            && self.product.model.is_some()
        {
            self.rederive();
        }
    }

    pub fn set_brand(&mut self, brand: &str) {
        let brand = non_empty(brand);
        if self.policy == ModelPolicy::ClearOnBrandChange && brand != self.product.brand {
            debug!("Brand changed, clearing model");
            self.product.model = None;
        }
        self.product.brand = brand;
        self.rederive();
    }

    pub fn set_model(&mut self, model: &str) {
        self.product.model = non_empty(model);
        self.rederive();
    }

    pub fn set_name(&mut self, name: &str) {
        self.product.name = name.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.product.description = description.to_string();
    }

    pub fn set_price(&mut self, price: f64) {
        self.product.price = price;
    }

    pub fn set_stock(&mut self, stock: i64) {
        self.product.stock = stock;
    }

    pub fn set_imei1(&mut self, imei: &str) {
        self.product.imei1 = non_empty(imei);
    }

    pub fn set_imei2(&mut self, imei: &str) {
        self.product.imei2 = non_empty(imei);
    }

    pub fn set_serial_number(&mut self, serial: &str) {
        self.product.serial_number = non_empty(serial);
    }

    pub fn set_registration_status(&mut self, status: RegistrationStatus) {
        self.product.registration_status = status;
    }

    /// The model selector is only usable once a brand is chosen.
    pub fn model_selector_enabled(&self) -> bool {
        self.product.brand.is_some()
    }

    pub fn model_choices<'a>(&self, brands: &[Brand], models: &'a [Model]) -> Vec<&'a Model> {
        models_for_brand(self.product.brand.as_deref(), brands, models)
    }

    /// False when a model is set that does not belong to the selected brand.
    pub fn model_is_consistent(&self, brands: &[Brand], models: &[Model]) -> bool {
        match self.product.model.as_deref() {
            None => true,
            Some(model) => self
                .model_choices(brands, models)
                .iter()
                .any(|m| m.name == model),
        }
    }

    /// Finishes the draft. New serialized products always start with stock 1.
    pub fn into_product(self) -> Product {
        let mut product = self.product;
        if product.is_serialized() && product.id.is_none() {
            product.stock = 1;
        }
        product
    }

    fn rederive(&mut self) {
        if self.product.is_serialized() {
            self.product = derive_name(self.product.clone());
        }
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
