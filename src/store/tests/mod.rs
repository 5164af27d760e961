//! Store tests against a mocked spreadsheet.

mod products_tests;
mod reference_tests;

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::{Session, StaticToken};
use crate::sheets::SheetsApi;
use crate::store::PosStore;

pub(super) fn store_with_mock(mock_uri: &str) -> PosStore {
    PosStore::new(SheetsApi::new("sheet-1".to_string()).with_base_url(mock_uri))
}

pub(super) fn session() -> Session {
    Session::acquire(Arc::new(StaticToken::new("test_token")))
}

/// One generic and one serialized product, on sheet rows 2 and 3.
pub(super) fn product_rows() -> Value {
    json!({
        "range": "Productos!A2:L3",
        "values": [
            ["100", "generic", "Funda", "Silicona", "10", "5"],
            ["200", "individual", "Samsung A54", "Negro", "500", "1",
             "Samsung", "A54", "111", "", "SN1", "Registrado"]
        ]
    })
}

/// Serves `body` for reads of the sheet whose encoded range starts with `sheet`.
pub(super) async fn mount_read(server: &MockServer, sheet: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path_regex(format!("^/spreadsheets/sheet-1/values/{sheet}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub(super) fn append_path(sheet: &str) -> String {
    format!("^/spreadsheets/sheet-1/values/{sheet}.*:append$")
}

pub(super) const BATCH_PATH: &str = "/spreadsheets/sheet-1/values:batchUpdate";
