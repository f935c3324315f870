//! Gateway tests against a local mock of the admin service.
//!
//! # Running
//!
//! ```sh
//! cargo test --test gateway
//! ```
//!
//! # What is tested
//!
//! - **Fund houses**: decoding, failure falls back to an empty list
//! - **Scheme page**: query encoding, empty filters omitted
//! - **Overview**: path encoding, empty and `null` bodies, legacy load field
//! - **Plan options / transaction detail**: decoding and fallbacks
//! - **Migration**: grouped page, CSV trigger, migrate-by-name body
//! - **Error handling**: typed `AdminError::Api` from the strict helpers

use mf_admin::types::scheme::SchemePageQuery;
use mf_admin::{AdminClient, AdminError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Route gateway logs to the test output; `RUST_LOG=debug` shows requests.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn mock_client() -> (MockServer, AdminClient) {
    init_tracing();
    let server = MockServer::start().await;
    let client = AdminClient::with_base_url(server.uri()).expect("client construction failed");
    (server, client)
}

// ===================================================================
// Fund houses
// ===================================================================

#[tokio::test]
async fn test_fund_houses() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/fund-house"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "HDFC Mutual Fund", "amfiId": "9", "camsKraCode": "H01",
             "active": true, "fundType": "MF"},
            {"id": 2, "name": "Axis Mutual Fund", "amfiId": 53, "active": false, "fundType": "MF"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let houses = client.get_fund_houses().await;
    assert_eq!(houses.len(), 2);
    assert_eq!(houses[0].cams_kra_code.as_deref(), Some("H01"));
    assert_eq!(houses[1].amfi_id, "53");
    assert_eq!(houses[1].karvy_kra_code, None);
}

#[tokio::test]
async fn test_fund_houses_failure_is_empty() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/fund-house"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    assert!(client.get_fund_houses().await.is_empty());
    let err = client.try_get_fund_houses().await.unwrap_err();
    assert!(matches!(err, AdminError::HttpStatus { .. }), "{err:?}");
}

#[tokio::test]
async fn test_unreachable_service_is_empty() {
    let client = AdminClient::with_base_url("http://127.0.0.1:9").unwrap();
    assert!(client.get_fund_houses().await.is_empty());
    assert!(client.get_scheme_overview("1").await.is_none());
    assert!(!client.load_scheme_csv().await);
}

#[tokio::test]
async fn test_amfi_schemes_are_opaque() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/amfi/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"schemeCode": 119551, "anything": ["goes", 1]}
        ])))
        .mount(&server)
        .await;

    let records = client.get_schemes_by_amfi("9").await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["schemeCode"], 119551);
}

// ===================================================================
// Scheme page
// ===================================================================

#[tokio::test]
async fn test_scheme_page_query_encoding() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/page"))
        .and(query_param("pageNo", "2"))
        .and(query_param("pageSize", "20"))
        .and(query_param("fundHouseId", "7"))
        .and(query_param("search", "flexi cap & more"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 11, "name": "Flexi Cap", "amfiId": 118955}],
            "pageNo": 2, "pageSize": 20, "totalCount": 41, "totalPages": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = SchemePageQuery::new(2, 20)
        .fund_house("7")
        .search("flexi cap & more");
    let page = client.get_schemes_page(&query).await.expect("page expected");
    assert_eq!(page.total_count, 41);
    assert_eq!(page.data[0].amfi_id.as_deref(), Some("118955"));
}

#[tokio::test]
async fn test_scheme_page_omits_empty_filters() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/page"))
        .and(query_param_is_missing("fundHouseId"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let query = SchemePageQuery::new(0, 10).fund_house("").search("");
    let page = client.get_schemes_page(&query).await.expect("page expected");
    assert!(page.data.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_scheme_page_failure_is_none() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    assert!(client.get_schemes_page(&SchemePageQuery::new(0, 10)).await.is_none());
}

// ===================================================================
// Overview
// ===================================================================

#[tokio::test]
async fn test_overview_path_is_percent_encoded() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/a%2Fb%20c/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "mfName": "HDFC", "schemeName": "Top 100", "schemeLoad": "Nil"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let overview = client
        .get_scheme_overview("a/b c")
        .await
        .expect("overview expected");
    assert_eq!(overview.scheme_name, "Top 100");
    assert_eq!(overview.entry_load.as_deref(), Some("Nil"));
}

#[tokio::test]
async fn test_overview_empty_and_null_bodies() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/1/overview"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheme/1/overview/sysnc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    assert!(client.get_scheme_overview("1").await.is_none());
    assert!(client.sync_scheme_overview("1").await.is_none());
    assert!(client.try_sync_scheme_overview("1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_overview_error_body_is_typed() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/9/overview"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404, "error": "Not Found", "message": "no scheme 9",
            "path": "/scheme/9/overview"
        })))
        .mount(&server)
        .await;

    match client.try_get_scheme_overview("9").await {
        Err(AdminError::Api(body)) => {
            assert_eq!(body.status, Some(404));
            assert_eq!(body.message.as_deref(), Some("no scheme 9"));
        }
        other => panic!("expected AdminError::Api, got {other:?}"),
    }
    assert!(client.get_scheme_overview("9").await.is_none());
}

// ===================================================================
// Plan options & transaction detail
// ===================================================================

#[tokio::test]
async fn test_plan_options_and_transaction_detail() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/3/plan-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "schemeNavName": "Direct Growth", "amfiCode": 120503, "planType": "Direct"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheme/3/transaction-detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8, "minRedemptionAmount": 1000,
            "systemTransactionRules": [
                {"id": 1, "type": "SIP", "frequency": "MONTHLY", "dayOrDates": [1, 15],
                 "minAmount": 500, "minInstallments": 6}
            ]
        })))
        .mount(&server)
        .await;

    let plans = client.get_scheme_plan_options("3").await;
    assert_eq!(plans[0].amfi_code.as_deref(), Some("120503"));

    let detail = client
        .get_scheme_transaction_detail("3")
        .await
        .expect("detail expected");
    assert_eq!(detail.min_redemption_amount, Some(1000.0));
    assert_eq!(detail.system_transaction_rules[0].day_or_dates, ["1", "15"]);
    assert_eq!(detail.system_transaction_rules[0].min_installments, Some(6));
}

#[tokio::test]
async fn test_plan_options_null_is_empty() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/4/plan-options"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    assert!(client.get_scheme_plan_options("4").await.is_empty());
    assert!(client.get_scheme_transaction_detail("4").await.is_none());
}

// ===================================================================
// Migration
// ===================================================================

#[tokio::test]
async fn test_grouped_migration_page() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/migration/grouped"))
        .and(query_param("pageNo", "0"))
        .and(query_param("pageSize", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "schemeName": "Liquid Fund", "navOptions": [
                {"schemeNavName": "Direct Growth", "code": "100", "migrated": true},
                {"schemeNavName": "Regular Growth", "code": 101}
            ]}],
            "pageNo": 0, "pageSize": 5, "totalCount": 1, "totalPages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .get_grouped_migration_schemes(0, 5)
        .await
        .expect("page expected");
    let group = &page.data[0];
    assert_eq!(group.id.as_deref(), Some("1"));
    assert_eq!(group.row_key(1), "Liquid Fund-101-1");
    assert!(!group.fully_migrated());
}

#[tokio::test]
async fn test_load_csv_and_migrate() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/getschemeCsv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("loaded 1200 rows"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/migration/scheme-name"))
        .and(body_json(json!({"schemeName": "Liquid Fund"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.load_scheme_csv().await);
    assert!(client.migrate_scheme_by_name("Liquid Fund").await);
}

#[tokio::test]
async fn test_migrate_failure_is_false() {
    let (server, client) = mock_client().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/migration/scheme-name"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "status": 409, "error": "Conflict", "message": "already migrated"
        })))
        .mount(&server)
        .await;

    assert!(!client.migrate_scheme_by_name("Liquid Fund").await);
    let err = client.try_migrate_scheme_by_name("Liquid Fund").await.unwrap_err();
    assert_eq!(err.to_string(), "API error: [409] Conflict: already migrated");
}

// ===================================================================
// Base URL handling
// ===================================================================

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/fund-house"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::with_base_url(format!("{}/api/v1/", server.uri())).unwrap();
    assert!(client.try_get_fund_houses().await.unwrap().is_empty());
}
