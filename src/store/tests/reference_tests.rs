//! Login and reference data.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{append_path, mount_read, session, store_with_mock};
use crate::auth::StaticToken;
use crate::error::PosError;
use crate::models::{default_payment_methods, Role};

fn users() -> serde_json::Value {
    json!({ "values": [
        ["1", "ana@shop.com", "Admin", "Ana Pérez"],
        ["2", "luis@shop.com", "Vendedor", "Luis Gómez"]
    ]})
}

#[tokio::test]
async fn login_matches_email_case_insensitively() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(&mock_server, "Usuarios", users()).await;

    let session = store
        .login(Arc::new(StaticToken::new("test_token")), "  LUIS@shop.com ")
        .await
        .unwrap();

    let user = session.user().unwrap();
    assert_eq!(user.id, 2);
    assert_eq!(user.role, Role::Seller);
    assert!(session.is_active());
}

#[tokio::test]
async fn login_of_unknown_user_is_denied() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(&mock_server, "Usuarios", users()).await;

    let err = store
        .login(Arc::new(StaticToken::new("test_token")), "nobody@shop.com")
        .await
        .unwrap_err();

    assert!(matches!(err, PosError::AuthorizationDenied(_)));
}

#[tokio::test]
async fn rejected_token_surfaces_as_authorization_error() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let err = store.list_brands(&session()).await.unwrap_err();
    assert!(err.is_authorization());
}

#[tokio::test]
async fn invalidated_session_makes_no_requests() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let session = session();
    session.invalidate();

    let err = store.list_customers(&session).await.unwrap_err();
    assert!(matches!(err, PosError::AuthorizationDenied(_)));
}

#[tokio::test]
async fn payment_methods_fall_back_to_defaults() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path_regex("^/spreadsheets/sheet-1/values/Metodos_Pago"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&mock_server)
        .await;

    let methods = store.list_payment_methods(&session()).await.unwrap();
    assert_eq!(methods, default_payment_methods());
}

#[tokio::test]
async fn payment_methods_do_not_hide_authorization_failures() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let err = store.list_payment_methods(&session()).await.unwrap_err();
    assert!(err.is_authorization());
}

#[tokio::test]
async fn reads_payment_methods_from_sheet() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(
        &mock_server,
        "Metodos_Pago",
        json!({ "values": [["1", "Efectivo"], ["7", "Mercado Pago"]] }),
    )
    .await;

    let methods = store.list_payment_methods(&session()).await.unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[1].name, "Mercado Pago");
}

#[tokio::test]
async fn creates_brand() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path_regex(append_path("Marcas")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let brand = store.create_brand(&session(), " Xiaomi ").await.unwrap();
    assert_eq!(brand.name, "Xiaomi");
}

#[tokio::test]
async fn model_requires_existing_brand() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(
        &mock_server,
        "Marcas",
        json!({ "values": [["1", "Samsung"]] }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path_regex(append_path("Modelos")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = store.create_model(&session(), 42, "A54").await.unwrap_err();
    assert!(matches!(err, PosError::InvalidInput(_)));
}

#[tokio::test]
async fn creates_model_under_brand() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(
        &mock_server,
        "Marcas",
        json!({ "values": [["1", "Samsung"]] }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path_regex(append_path("Modelos")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let model = store.create_model(&session(), 1, "A54").await.unwrap();
    assert_eq!(model.brand_id, 1);
    assert_eq!(model.name, "A54");
}

#[tokio::test]
async fn creates_customer_row() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path_regex(append_path("Clientes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let customer = store
        .create_customer(&session(), "Marta Díaz", "Calle 1", "30111222", "555-1234")
        .await
        .unwrap();
    assert_eq!(customer.full_name, "Marta Díaz");
}

#[tokio::test]
async fn skips_short_customer_rows() {
    let mock_server = MockServer::start().await;
    let store = store_with_mock(&mock_server.uri());
    mount_read(
        &mock_server,
        "Clientes",
        json!({ "values": [
            ["1", "Marta Díaz", "Calle 1", "30111222", "555-1234"],
            ["2", "Sin datos"]
        ]}),
    )
    .await;

    let customers = store.list_customers(&session()).await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].dni, "30111222");
}
