//! Integration tests for the public API.
//!
//! Drive the product form, the store and the report together against a
//! mocked spreadsheet.

use std::sync::Arc;

use phone_shop_pos::inventory::{models_for_brand, validate_no_duplicate, ModelPolicy, ProductDraft};
use phone_shop_pos::{
    Brand, Model, PaymentAllocation, PosError, PosStore, Product, ProductKind, ReportData,
    SaleJournal, SaleLineItem, SalePayload, SaleStep, Session, SheetsApi, StaticToken,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog() -> (Vec<Brand>, Vec<Model>) {
    let brands = vec![
        Brand {
            id: 1,
            name: "Samsung".to_string(),
        },
        Brand {
            id: 2,
            name: "Motorola".to_string(),
        },
    ];
    let models = vec![
        Model {
            id: 10,
            brand_id: 1,
            name: "A54".to_string(),
        },
        Model {
            id: 11,
            brand_id: 1,
            name: "S23".to_string(),
        },
        Model {
            id: 20,
            brand_id: 2,
            name: "G84".to_string(),
        },
    ];
    (brands, models)
}

fn session() -> Session {
    Session::acquire(Arc::new(StaticToken::new("test_token")))
}

async fn mount_products(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex("^/spreadsheets/sheet-1/values/Productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "values": [
            ["100", "generic", "Funda", "Silicona", "10", "5"],
            ["200", "individual", "Samsung A54", "Negro", "500", "1",
             "Samsung", "A54", "111", "", "SN1", "Registrado"]
        ]})))
        .mount(server)
        .await;
}

async fn mount_appends(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path_regex(":append$"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
        .mount(server)
        .await;
}

// ==================== Product Form ====================

mod product_form {
    use super::*;

    #[test]
    fn serialized_draft_names_itself_from_brand_and_model() {
        let (brands, models) = catalog();
        let mut draft = ProductDraft::new(ProductKind::Serialized);

        assert!(!draft.model_selector_enabled());
        draft.set_brand("Samsung");
        assert_eq!(draft.model_choices(&brands, &models).len(), 2);
        draft.set_model("S23");
        draft.set_imei1("357000000000001");

        let product = draft.into_product();
        assert_eq!(product.name, "Samsung S23");
        assert_eq!(product.stock, 1);
    }

    #[test]
    fn stale_model_is_detectable_after_brand_change() {
        let (brands, models) = catalog();
        let mut draft = ProductDraft::new(ProductKind::Serialized);
        draft.set_brand("Samsung");
        draft.set_model("A54");
        draft.set_brand("Motorola");

        assert_eq!(draft.product().name, "Motorola A54");
        assert!(!draft.model_is_consistent(&brands, &models));
    }

    #[test]
    fn clearing_policy_drops_model_on_brand_change() {
        let (brands, models) = catalog();
        let mut draft =
            ProductDraft::new(ProductKind::Serialized).with_policy(ModelPolicy::ClearOnBrandChange);
        draft.set_brand("Samsung");
        draft.set_model("A54");
        draft.set_brand("Motorola");

        assert_eq!(draft.product().model, None);
        assert_eq!(draft.product().name, "Motorola");
        assert!(draft.model_is_consistent(&brands, &models));
    }

    #[test]
    fn unknown_brand_offers_no_models() {
        let (brands, models) = catalog();
        assert!(models_for_brand(Some("Nokia"), &brands, &models).is_empty());
        assert!(models_for_brand(None, &brands, &models).is_empty());
    }

    #[test]
    fn draft_result_is_checked_against_inventory() {
        let existing =
            vec![Product::serialized("Samsung", "A54", "", 500.0).with_serial_number("SN1")];

        let mut draft = ProductDraft::new(ProductKind::Serialized);
        draft.set_brand("Samsung");
        draft.set_model("S23");
        draft.set_serial_number(" SN1 ");

        let err = validate_no_duplicate(&draft.into_product(), &existing).unwrap_err();
        assert!(matches!(err, PosError::ValidationConflict(_)));
    }
}

// ==================== Store Workflow ====================

mod store_workflow {
    use super::*;

    #[tokio::test]
    async fn partial_sale_survives_restart_and_is_resumed() {
        let dir = TempDir::new().unwrap();
        let journal_path = dir.path().join("journal.json");
        let mock_server = MockServer::start().await;

        let sale_id = {
            let store = PosStore::with_journal(
                SheetsApi::new("sheet-1".to_string()).with_base_url(&mock_server.uri()),
                SaleJournal::open(&journal_path).unwrap(),
            );
            mount_products(&mock_server).await;
            mount_appends(&mock_server, 200).await;
            Mock::given(method("POST"))
                .and(path("/spreadsheets/sheet-1/values:batchUpdate"))
                .respond_with(ResponseTemplate::new(503))
                .mount(&mock_server)
                .await;

            let payload = SalePayload {
                seller_id: 1,
                customer_id: 7,
                total: 20.0,
                items: vec![SaleLineItem::new(100, 2, 10.0)],
                payments: vec![PaymentAllocation {
                    method: "Efectivo".to_string(),
                    amount: 20.0,
                }],
            };

            match store.record_sale(&session(), payload).await.unwrap_err() {
                PosError::PartialSale {
                    sale_id, completed, ..
                } => {
                    assert_eq!(
                        completed,
                        vec![SaleStep::SaleRow, SaleStep::Details, SaleStep::Payments]
                    );
                    sale_id
                }
                other => panic!("expected PartialSale, got {other:?}"),
            }
        };

        mock_server.reset().await;
        mount_products(&mock_server).await;
        Mock::given(method("POST"))
            .and(path_regex(":append$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/spreadsheets/sheet-1/values:batchUpdate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let store = PosStore::with_journal(
            SheetsApi::new("sheet-1".to_string()).with_base_url(&mock_server.uri()),
            SaleJournal::open(&journal_path).unwrap(),
        );
        assert_eq!(store.journal().pending().unwrap().len(), 1);

        let receipt = store.resume_sale(&session(), &sale_id).await.unwrap();
        assert_eq!(receipt.stock_updates[0].new_stock, 3);
        assert!(store.journal().pending().unwrap().is_empty());
    }

    #[tokio::test]
    async fn recorded_sales_feed_the_report() {
        let mock_server = MockServer::start().await;
        let store =
            PosStore::new(SheetsApi::new("sheet-1".to_string()).with_base_url(&mock_server.uri()));

        mount_products(&mock_server).await;
        for (sheet, values) in [
            (
                "Ventas",
                json!([["SALE-1", "2024-05-01T10:00:00.000Z", "1", "7", "520"]]),
            ),
            (
                "Detalle_Venta%21",
                json!([["SALE-1", "100", "2", "10"], ["SALE-1", "200", "1", "500"]]),
            ),
            (
                "Detalle_Venta_Metodo_Pago",
                json!([["SALE-1", "Efectivo", "520"]]),
            ),
            ("Clientes", json!([])),
            ("Usuarios", json!([["1", "ana@shop.com", "Admin", "Ana"]])),
        ] {
            Mock::given(method("GET"))
                .and(path_regex(format!("^/spreadsheets/sheet-1/values/{sheet}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "values": values })))
                .mount(&mock_server)
                .await;
        }

        let session = session();
        let data = store.load_sales_data(&session).await.unwrap();
        let users = store.list_users(&session).await.unwrap();
        let report = ReportData::build(&data, &users);

        assert_eq!(report.sale_count, 1);
        assert_eq!(report.total_sales, 520.0);
        assert_eq!(report.sales_by_product[0].name, "Samsung A54");
        assert_eq!(report.sales_by_seller[0].seller, "Ana");
        assert_eq!(data.sales[0].customer.full_name, "Cliente Desconocido");
    }
}
