//! Error types for phone_shop_pos

use thiserror::Error;

use crate::journal::SaleStep;

/// Unified error type for inventory, store and session operations.
///
/// Every variant is terminal for the operation that produced it; nothing in
/// this crate retries automatically.
#[derive(Debug, Error)]
pub enum PosError {
    /// A candidate product collides with an existing one.
    #[error("Duplicate product: {0}")]
    ValidationConflict(String),

    /// Input rejected before any write (blank name, negative price, unknown id...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Sale payload rejected before any write.
    #[error("Invalid sale: {0}")]
    InvalidSale(String),

    /// Reading a range from the remote store failed.
    #[error("Failed to read {range}: {message}")]
    RemoteRead { range: String, message: String },

    /// Appending or overwriting cells in the remote store failed.
    #[error("Failed to write {range}: {message}")]
    RemoteWrite { range: String, message: String },

    /// The user declined consent, the token was rejected or the session was closed.
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    /// A stored row could not be turned into a record.
    #[error("Row decode error: {0}")]
    Decode(String),

    /// A sale was only partly written. `completed` lists the steps that landed.
    #[error("Sale {sale_id} partially recorded (completed: {completed:?}): {source}")]
    PartialSale {
        sale_id: String,
        completed: Vec<SaleStep>,
        #[source]
        source: Box<PosError>,
    },

    /// Another submission is still in flight.
    #[error("Another operation is in progress")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    /// A report could not be exported.
    #[error("Export error: {0}")]
    Export(String),

    /// The sale journal could not be read or written.
    #[error("Journal error: {0}")]
    Journal(String),
}

impl PosError {
    /// Returns true when re-authenticating can fix the failure.
    pub fn is_authorization(&self) -> bool {
        match self {
            PosError::AuthorizationDenied(_) => true,
            PosError::PartialSale { source, .. } => source.is_authorization(),
            _ => false,
        }
    }
}

/// Result alias for phone_shop_pos operations
pub type Result<T> = std::result::Result<T, PosError>;
