//! Product creation and editing.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{append_path, mount_read, product_rows, session, store_with_mock, BATCH_PATH};
use crate::error::PosError;
use crate::models::{Product, ProductKind};

#[tokio::test]
async fn lists_products_with_sheet_rows() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(
        &mock_server,
        "Productos",
        json!({ "values": [
            ["100", "generic", "Funda", "Silicona", "10", "5"],
            ["broken"],
            ["200", "individual", "Samsung A54", "Negro", "500", "1"]
        ]}),
    )
    .await;

    let products = store.list_products(&session()).await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].row, 2);
    assert_eq!(products[1].row, 4);
    assert_eq!(products[1].product.kind, ProductKind::Serialized);
}

#[tokio::test]
async fn duplicate_imei_is_rejected_without_writing() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(&mock_server, "Productos", product_rows()).await;

    Mock::given(method("POST"))
        .and(path_regex(append_path("Productos")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let candidate = Product::serialized("Motorola", "G84", "Azul", 300.0).with_imei1("111");
    let err = store.create_product(&session(), candidate).await.unwrap_err();

    assert!(matches!(err, PosError::ValidationConflict(_)));
}

#[tokio::test]
async fn duplicate_generic_name_ignores_case() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(&mock_server, "Productos", product_rows()).await;

    Mock::given(method("POST"))
        .and(path_regex(append_path("Productos")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let candidate = Product::generic("FUNDA", "silicona", 12.0, 3);
    let err = store.create_product(&session(), candidate).await.unwrap_err();

    assert!(matches!(err, PosError::ValidationConflict(_)));
}

#[tokio::test]
async fn creates_serialized_product_with_stock_one() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(&mock_server, "Productos", product_rows()).await;

    Mock::given(method("POST"))
        .and(path_regex(append_path("Productos")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updates": { "updatedRange": "Productos!A4:L4", "updatedRows": 1 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut candidate = Product::serialized("Motorola", "G84", "Azul", 300.0).with_imei1("999");
    candidate.stock = 7;
    let created = store.create_product(&session(), candidate).await.unwrap();

    assert_eq!(created.name, "Motorola G84");
    assert_eq!(created.stock, 1);
    assert!(created.id.unwrap() > 200);
}

#[tokio::test]
async fn blank_generic_name_is_invalid() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());

    let err = store
        .create_product(&session(), Product::generic("  ", "x", 1.0, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, PosError::InvalidInput(_)));
}

#[tokio::test]
async fn negative_stock_is_rejected_without_writing() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(&mock_server, "Productos", product_rows()).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = store
        .create_product(&session(), Product::generic("Cable", "USB-C", 5.0, -3))
        .await
        .unwrap_err();
    assert!(matches!(err, PosError::InvalidInput(_)));

    let mut edited = Product::generic("Funda", "Silicona", 10.0, -1);
    edited.id = Some(100);
    let err = store.update_product(&session(), edited).await.unwrap_err();
    assert!(matches!(err, PosError::InvalidInput(_)));
}

#[tokio::test]
async fn update_overwrites_own_row_and_excludes_itself() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(&mock_server, "Productos", product_rows()).await;

    Mock::given(method("POST"))
        .and(path(BATCH_PATH))
        .and(body_partial_json(json!({
            "valueInputOption": "USER_ENTERED",
            "data": [{ "range": "Productos!A3:L3" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalUpdatedCells": 12
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut edited = Product::serialized("Samsung", "A55", "Negro", 450.0)
        .with_imei1("111")
        .with_serial_number("SN1");
    edited.id = Some(200);

    let saved = store.update_product(&session(), edited).await.unwrap();
    assert_eq!(saved.name, "Samsung A55");
}

#[tokio::test]
async fn update_of_unknown_product_fails() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(&mock_server, "Productos", product_rows()).await;

    let mut edited = Product::generic("Cargador", "USB-C", 20.0, 2);
    edited.id = Some(999);

    let err = store.update_product(&session(), edited).await.unwrap_err();
    assert!(matches!(err, PosError::InvalidInput(_)));
}

#[tokio::test]
async fn second_submission_is_busy() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());

    let _guard = store.begin_submission().unwrap();
    let err = store
        .create_product(&session(), Product::generic("Funda", "Cuero", 15.0, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, PosError::Busy));
}

#[tokio::test]
async fn busy_flag_is_released_after_failure() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());

    let _ = store
        .create_product(&session(), Product::generic("", "", 1.0, 1))
        .await;

    assert!(store.begin_submission().is_ok());
}

#[test]
fn ids_are_strictly_increasing_and_above_floor() {
    let store = store_with_mock("http://localhost:1");
    let far_future = chrono::Utc::now().timestamp_millis() + 1_000_000;

    let a = store.next_id(0);
    let b = store.next_id(0);
    let c = store.next_id(far_future);

    assert!(b > a);
    assert_eq!(c, far_future + 1);
}
