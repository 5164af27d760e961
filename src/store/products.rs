//! Product listing, creation and in-place editing.

use log::{debug, info};

use crate::auth::Session;
use crate::error::{PosError, Result};
use crate::inventory::{derive_name, validate_no_duplicate};
use crate::models::{Product, StoredProduct};
use crate::rows::product::MIN_CELLS as PRODUCT_MIN_CELLS;
use crate::rows::{self, ranges};

use super::PosStore;

/// Rejects products that cannot be stored regardless of the rest of the inventory.
fn check_product(product: &Product) -> Result<()> {
    if product.name.trim().is_empty() {
        return Err(PosError::InvalidInput("product name is empty".to_string()));
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(PosError::InvalidInput(format!(
            "price must be a non-negative number, got {}",
            product.price
        )));
    }
    if product.stock < 0 {
        return Err(PosError::InvalidInput(format!(
            "stock must not be negative, got {}",
            product.stock
        )));
    }
    Ok(())
}

impl PosStore {
    /// Reads all products with their sheet rows.
    pub async fn list_products(&self, session: &Session) -> Result<Vec<StoredProduct>> {
        let values = self.api.get_values(session, ranges::PRODUCTS).await?;
        let products: Vec<StoredProduct> =
            rows::decode_all(&values, PRODUCT_MIN_CELLS, rows::decode_product)
                .into_iter()
                .map(|(row, product)| StoredProduct { row, product })
                .collect();
        debug!("Loaded {} products", products.len());
        Ok(products)
    }

    /// Registers a new product.
    ///
    /// The name of a serialized device is derived from brand and model and its
    /// stock is forced to 1. The duplicate check runs against a fresh read of
    /// the product sheet; on conflict nothing is written.
    pub async fn create_product(&self, session: &Session, product: Product) -> Result<Product> {
        let _guard = self.begin_submission()?;

        let mut product = derive_name(product);
        product.id = None;
        if product.is_serialized() {
            product.stock = 1;
        }
        check_product(&product)?;

        let snapshot = self.list_products(session).await?;
        validate_no_duplicate(&product, snapshot.iter().map(|s| &s.product))?;

        let highest = snapshot
            .iter()
            .filter_map(|s| s.product.id)
            .max()
            .unwrap_or(0);
        product.id = Some(self.next_id(highest));

        let cells = rows::encode_product(&product)?;
        self.api
            .append_rows(session, ranges::PRODUCTS_APPEND, vec![cells])
            .await?;

        info!(
            "Created product '{}' (ID: {:?})",
            product.name, product.id
        );
        Ok(product)
    }

    /// Overwrites an existing product's row.
    ///
    /// The duplicate check excludes the product's own id, so saving with
    /// unchanged identifiers never conflicts.
    pub async fn update_product(&self, session: &Session, product: Product) -> Result<Product> {
        let _guard = self.begin_submission()?;

        let id = product
            .id
            .ok_or_else(|| PosError::InvalidInput("cannot update a product without id".to_string()))?;
        let product = derive_name(product);
        check_product(&product)?;

        let snapshot = self.list_products(session).await?;
        let row = snapshot
            .iter()
            .find(|s| s.product.id == Some(id))
            .map(|s| s.row)
            .ok_or_else(|| PosError::InvalidInput(format!("product {id} not found")))?;

        validate_no_duplicate(&product, snapshot.iter().map(|s| &s.product))?;

        let cells = rows::encode_product(&product)?;
        self.api
            .batch_update(session, vec![(ranges::product_row(row), vec![cells])])
            .await?;

        info!("Updated product '{}' (ID: {id}, row {row})", product.name);
        Ok(product)
    }
}
