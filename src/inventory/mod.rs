//! Inventory consistency rules.
//!
//! Pure functions used by the product and sale screens before anything is
//! written to the store.
//!
//! # Module Structure
//!
//! - [`duplicates`] - IMEI / serial / name collision checks
//! - [`naming`] - Display name derivation for serialized devices
//! - [`stock`] - Stock overwrites for a recorded sale
//! - [`catalog`] - Brand/model selection and product form state

pub mod catalog;
pub mod duplicates;
pub mod naming;
pub mod stock;

pub use catalog::{models_for_brand, ModelPolicy, ProductDraft};
pub use duplicates::{find_conflict, is_duplicate, validate_no_duplicate, Conflict};
pub use naming::{compose_name, derive_name};
pub use stock::compute_stock_updates;
