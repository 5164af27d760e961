//! Tests for SheetsApi construction.

use crate::sheets::{SheetsApi, DEFAULT_BASE_URL};

#[test]
fn creates_api_for_spreadsheet() {
    let api = SheetsApi::new("sheet-1".to_string());
    assert_eq!(api.spreadsheet_id(), "sheet-1");
    assert_eq!(api.base_url, "https://sheets.googleapis.com/v4");
}

#[test]
fn api_has_default_base_url() {
    let api = SheetsApi::new("sheet-1".to_string());
    assert_eq!(api.base_url, DEFAULT_BASE_URL);
}

#[test]
fn base_url_override_drops_trailing_slash() {
    let api = SheetsApi::new("sheet-1".to_string()).with_base_url("http://localhost:9999/");
    assert_eq!(api.base_url, "http://localhost:9999");
}
