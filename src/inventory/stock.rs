//! Stock decrement for recorded sales.
//!
//! All updates for one sale are computed from a single product snapshot read
//! right before the write. Line items referencing the same product each
//! produce their own update from that snapshot, so the last one written wins.
//! Resulting stock is not clamped: overselling leaves a negative value.

use log::{debug, warn};

use crate::error::{PosError, Result};
use crate::models::{SaleLineItem, StockUpdate, StoredProduct};

/// Computes one stock overwrite per line item whose product is in `snapshot`.
///
/// Items whose product id is not found are skipped. A decrement that does not
/// fit in an `i64` fails the whole computation with [`PosError::InvalidSale`].
pub fn compute_stock_updates(
    items: &[SaleLineItem],
    snapshot: &[StoredProduct],
) -> Result<Vec<StockUpdate>> {
    let mut updates = Vec::with_capacity(items.len());

    for item in items {
        let Some(stored) = snapshot
            .iter()
            .find(|stored| stored.product.id == Some(item.product_id))
        else {
            warn!(
                "Product {} not found in snapshot, stock left unchanged",
                item.product_id
            );
            continue;
        };

        let new_stock = stored
            .product
            .stock
            .checked_sub(item.quantity)
            .ok_or_else(|| {
                PosError::InvalidSale(format!(
                    "quantity {} for product {} overflows stock {}",
                    item.quantity, item.product_id, stored.product.stock
                ))
            })?;
        debug!(
            "Product {} (row {}): stock {} - {} = {}",
            item.product_id, stored.row, stored.product.stock, item.quantity, new_stock
        );
        if new_stock < 0 {
            warn!(
                "Product {} oversold, stock goes to {}",
                item.product_id, new_stock
            );
        }

        updates.push(StockUpdate {
            product_id: item.product_id,
            row: stored.row,
            new_stock,
        });
    }

    Ok(updates)
}
