//! Spreadsheet API client.
//!
//! Thin wrapper over the Google Sheets v4 `values` endpoints: read a range,
//! append rows to a range and overwrite a batch of ranges. The store has no
//! transactions and no row locking; every call stands alone.

mod client;
mod values;

use reqwest::Client;
use serde::Deserialize;

pub use values::AppendResult;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Spreadsheet client bound to a single spreadsheet document.
pub struct SheetsApi {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) spreadsheet_id: String,
}

impl SheetsApi {
    /// Creates a client for the spreadsheet `spreadsheet_id`.
    pub fn new(spreadsheet_id: String) -> Self {
        log::info!("Creating spreadsheet client");
        log::debug!("Spreadsheet ID: {spreadsheet_id}");
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id,
        }
    }

    /// Points the client at another API root (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }
}

/// `ValueRange` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ValueRange {
    #[serde(default)]
    pub(crate) values: Option<Vec<Vec<serde_json::Value>>>,
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
