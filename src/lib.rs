//! Phone Shop Point of Sale
//!
//! Inventory and sales back end for a small phone and accessory shop, using a
//! spreadsheet as its only database. The [`inventory`] module holds the
//! consistency rules (duplicate detection, derived device names, stock
//! decrement, brand/model selection); [`store`] applies them against the
//! spreadsheet through [`sheets`].

pub mod auth;
pub mod config;
pub mod error;
pub mod inventory;
pub mod journal;
pub mod models;
pub mod reports;
pub mod rows;
pub mod sheets;
pub mod store;

pub use auth::{CredentialProvider, EnvToken, Session, StaticToken};
pub use config::Config;
pub use error::{PosError, Result};
pub use journal::{SaleJournal, SaleStep};
pub use models::*;
pub use reports::ReportData;
pub use sheets::SheetsApi;
pub use store::{PosStore, SaleReceipt, SalesData};
