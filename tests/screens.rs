//! Screen state tests: list refreshes, filters, the overview fallback, the
//! migration controls, editors and the bulk loader.
//!
//! # Running
//!
//! ```sh
//! cargo test --test screens
//! ```
//!
//! # What is tested
//!
//! - **Fund houses**: populated and empty tables
//! - **Schemes**: filter and page-size changes reset to page 0, stale pages
//! - **Scheme detail**: overview fallback syncs exactly once, local edits
//! - **Migration**: per-row in-flight flags, CSV load, page sizes
//! - **Funds / local schemes**: create returns to page 1, invalid drafts
//! - **Data loader**: JSON and CSV imports with report and progress

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mf_admin::constants::EMPTY_TABLE_MESSAGE;
use mf_admin::screens::data_loader::{DataLoader, ImportFormat, Progress};
use mf_admin::screens::fund_houses::FundHousesScreen;
use mf_admin::screens::funds::FundsScreen;
use mf_admin::screens::migration::MigrationScreen;
use mf_admin::screens::scheme_detail::SchemeDetailScreen;
use mf_admin::screens::schemes::{LocalSchemesScreen, SchemesScreen};
use mf_admin::store::{LocalStore, ReferenceRepository};
use mf_admin::table::TableBody;
use mf_admin::types::fund::NewFund;
use mf_admin::types::page::PageResponse;
use mf_admin::types::scheme::SchemeApiItem;
use mf_admin::{AdminClient, AdminError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
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

fn offline_client() -> AdminClient {
    AdminClient::with_base_url("http://127.0.0.1:9").expect("client construction failed")
}

fn item(id: i64, name: &str) -> SchemeApiItem {
    SchemeApiItem {
        id,
        name: name.to_owned(),
        amfi_id: Some("118955".to_owned()),
    }
}

fn new_fund(name: &str) -> NewFund {
    NewFund {
        name: name.to_owned(),
        amc_name: "Test AMC".to_owned(),
        ..Default::default()
    }
}

// ===================================================================
// Fund houses
// ===================================================================

#[tokio::test]
async fn test_fund_house_table() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/fund-house"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "HDFC Mutual Fund", "amfiId": 9, "active": true, "fundType": "MF"}
        ])))
        .mount(&server)
        .await;

    let screen = FundHousesScreen::open(client).await;
    assert!(!screen.is_loading());
    let view = screen.view();
    let row = &view.rows().expect("rows expected")[0];
    let texts: Vec<_> = row.iter().map(|cell| cell.text.as_str()).collect();
    assert_eq!(texts, ["HDFC Mutual Fund", "9", "MF", "Active", "N/A", "N/A"]);
}

#[tokio::test]
async fn test_fund_house_failure_shows_empty_table() {
    let screen = FundHousesScreen::open(offline_client()).await;
    assert!(screen.houses().is_empty());
    assert_eq!(
        screen.view().body,
        TableBody::Empty {
            message: EMPTY_TABLE_MESSAGE,
            colspan: 6
        }
    );
}

// ===================================================================
// Remote schemes
// ===================================================================

#[tokio::test]
async fn test_search_resets_to_first_page() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/page"))
        .and(query_param("pageNo", "0"))
        .and(query_param("search", "flexi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 4, "name": "Flexi Cap"}],
            "pageNo": 0, "pageSize": 10, "totalCount": 41, "totalPages": 5
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheme/page"))
        .and(query_param("pageNo", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = SchemesScreen::new(client);
    screen.set_page(3).await;
    screen.set_search(Some("  flexi ".into())).await;

    assert_eq!(screen.query().page_no, 0);
    assert_eq!(screen.query().search.as_deref(), Some("flexi"));
    assert_eq!(screen.rows().len(), 1);
    assert_eq!(screen.item(4).map(|i| i.name.as_str()), Some("Flexi Cap"));
    assert_eq!(screen.pager().to_string(), "Page 1 of 5");
    assert_eq!(
        screen.view().pagination.map(|p| p.to_string()).as_deref(),
        Some("Showing 1 to 10 of 41 results")
    );
}

#[tokio::test]
async fn test_page_size_and_fund_house_reset_page() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/page"))
        .and(query_param("pageNo", "0"))
        .and(query_param("pageSize", "25"))
        .and(query_param("fundHouseId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheme/page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let mut screen = SchemesScreen::new(client);
    screen.set_page(2).await;
    screen.set_page_size(25).await.expect("page size rejected");
    assert_eq!(screen.query().page_no, 0);

    screen.set_page(4).await;
    screen.set_fund_house(Some("7".into())).await;
    assert_eq!(screen.query().page_no, 0);

    assert!(matches!(
        screen.set_page_size(0).await,
        Err(AdminError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_stale_scheme_page_is_discarded() {
    let mut screen = SchemesScreen::new(offline_client());
    let first = screen.begin_refresh();
    let second = screen.begin_refresh();

    let late = PageResponse {
        data: vec![item(1, "Late")],
        page_no: 0,
        page_size: 10,
        total_count: 1,
        total_pages: 1,
    };
    assert!(!screen.apply_refresh(first, Some(late)));
    assert!(screen.is_loading());
    assert!(screen.rows().is_empty());

    assert!(screen.apply_refresh(second, None));
    assert!(!screen.is_loading());
    assert_eq!(screen.total_count(), 0);
}

// ===================================================================
// Scheme detail
// ===================================================================

#[tokio::test]
async fn test_overview_falls_back_to_one_sync() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/7/overview"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheme/7/overview/sysnc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheme/7/plan-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "schemeNavName": "Direct Growth"}
        ])))
        .mount(&server)
        .await;

    let mut screen = SchemeDetailScreen::open(client, item(7, "Flexi Cap")).await;
    assert!(screen.overview().is_none());
    assert!(screen.overview_fields().is_empty());
    assert_eq!(screen.plan_options().len(), 1);
    assert!(screen.transaction_detail().is_none());
    assert!(!screen.is_overview_loading());

    // With nothing loaded the editor starts from the list item.
    screen.open_overview_editor();
    let draft = screen.overview_draft_mut().expect("editor should be open");
    assert_eq!(draft.id, 7);
    assert_eq!(draft.mf_name, "118955");
    assert_eq!(draft.scheme_name, "Flexi Cap");
    draft.benchmark = Some("NIFTY 500 TRI".into());

    let saved = screen.save_overview().expect("save failed");
    assert_eq!(saved.benchmark.as_deref(), Some("NIFTY 500 TRI"));
    assert!(!screen.overview_editor().is_open());
    assert!(
        screen
            .overview_fields()
            .contains(&("Benchmark", "NIFTY 500 TRI".to_owned()))
    );
}

#[tokio::test]
async fn test_overview_sync_fills_missing_overview() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/8/overview"))
        .respond_with(ResponseTemplate::new(404).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheme/8/overview/sysnc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8, "mfName": "Axis", "schemeName": "Axis Liquid", "launchDate": "2010-03-09T00:00:00"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let mut screen = SchemeDetailScreen::open(client, item(8, "Axis Liquid")).await;
    let overview = screen.overview().expect("synced overview expected");
    assert_eq!(overview.mf_name, "Axis");
    assert!(
        screen
            .overview_fields()
            .contains(&("Launch Date", "2010-03-09".to_owned()))
    );

    // The manual sync hits the second expected call.
    assert!(screen.sync_overview().await);
    assert!(!screen.is_syncing());
}

#[tokio::test]
async fn test_local_plan_and_rule_edits() {
    let mut screen = SchemeDetailScreen::new(offline_client(), item(1, "Liquid"));

    screen.open_create_plan();
    screen.plan_draft_mut().unwrap().scheme_nav_name = "Direct Growth".into();
    assert_eq!(screen.save_plan().unwrap(), 1);

    screen.open_create_plan();
    screen.plan_draft_mut().unwrap().scheme_nav_name = "Regular Growth".into();
    assert_eq!(screen.save_plan().unwrap(), 2);
    assert_eq!(screen.plan_options()[0].scheme_nav_name, "Regular Growth");

    screen.open_update_plan(1).unwrap();
    screen.plan_draft_mut().unwrap().plan_type = Some("Direct".into());
    assert_eq!(screen.save_plan().unwrap(), 1);
    assert_eq!(screen.plan_options().len(), 2);
    assert_eq!(screen.plan_options()[1].plan_type.as_deref(), Some("Direct"));

    assert!(screen.open_update_plan(99).is_err());

    screen.open_create_rule();
    screen.rule_draft_mut().unwrap().frequency = Some("MONTHLY".into());
    assert_eq!(screen.save_rule().unwrap(), 1);
    let detail = screen.transaction_detail().expect("detail created on first rule");
    assert_eq!(detail.system_transaction_rules.len(), 1);
    assert_eq!(screen.rule_view().rows().unwrap()[0][2].text, "N/A");
}

// ===================================================================
// Migration
// ===================================================================

#[tokio::test]
async fn test_migrating_row_is_busy_until_done() {
    let (server, client) = mock_client().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/migration/scheme-name"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .expect(2)
        .mount(&server)
        .await;

    let screen = MigrationScreen::new(client);
    let (first, repeat, other, in_flight) = tokio::join!(
        screen.migrate("Liquid Fund", "Liquid Fund-100-0"),
        screen.migrate("Liquid Fund", "Liquid Fund-100-0"),
        screen.migrate("Overnight Fund", "Overnight Fund-200-0"),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            screen.migrating_rows()
        },
    );

    assert!(first.expect("first migrate failed"));
    assert!(matches!(repeat, Err(AdminError::Busy(_))));
    assert!(other.expect("independent row failed"));
    assert_eq!(in_flight, ["Liquid Fund-100-0", "Overnight Fund-200-0"]);
    assert!(!screen.is_migrating("Liquid Fund-100-0"));
    assert!(screen.migrating_rows().is_empty());
}

#[tokio::test]
async fn test_failed_migration_clears_flag() {
    let (server, client) = mock_client().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/migration/scheme-name"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let screen = MigrationScreen::new(client);
    assert!(!screen.migrate("Liquid Fund", "row").await.unwrap());
    assert!(!screen.is_migrating("row"));
}

#[tokio::test]
async fn test_load_csv_refreshes_page() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/scheme/getschemeCsv"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/migration/grouped"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"schemeName": "Liquid Fund", "navOptions": [
                {"schemeNavName": "Direct Growth", "code": "100"},
                {"schemeNavName": "Regular Growth", "code": "101", "migrated": true}
            ]}],
            "pageNo": 0, "pageSize": 10, "totalCount": 1, "totalPages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = MigrationScreen::new(client);
    assert!(screen.load_csv().await);
    assert!(!screen.is_csv_loading());
    assert_eq!(screen.total_count(), 1);

    let rows = screen.table_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].row_key, "Liquid Fund-101-1");
    let view = screen.view();
    let cells = view.rows().unwrap();
    assert_eq!(cells[0][6].text, "Not Migrated");
    assert_eq!(cells[1][6].text, "Migrated");
    assert!(!screen.pager().has_next());
}

#[tokio::test]
async fn test_migration_page_size_choices() {
    let (server, client) = mock_client().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/migration/grouped"))
        .and(query_param("pageNo", "0"))
        .and(query_param("pageSize", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/migration/grouped"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let mut screen = MigrationScreen::new(client.clone());
    screen.set_page(2).await;
    assert!(matches!(
        screen.set_page_size(7).await,
        Err(AdminError::InvalidArgument(_))
    ));
    assert_eq!(screen.page(), 2);

    screen.set_page_size(20).await.unwrap();
    assert_eq!((screen.page(), screen.page_size()), (0, 20));

    assert!(MigrationScreen::with_page(client, 0, 15).is_err());
}

// ===================================================================
// Funds and local schemes
// ===================================================================

#[tokio::test]
async fn test_created_fund_lands_on_first_page() {
    let store = Arc::new(LocalStore::in_memory());
    for i in 0..12 {
        store.create_fund(new_fund(&format!("Fund {i}"))).await.unwrap();
    }

    let mut screen = FundsScreen::new(store.clone());
    screen.set_page(2).await.unwrap();
    assert_eq!(screen.rows().len(), 2);

    screen.open_create();
    let draft = screen.draft_mut().expect("editor should be open");
    draft.name = "Parag Parikh Flexi Cap".into();
    draft.amc_name = "PPFAS".into();
    let saved = screen.save().await.expect("save failed");

    assert_eq!(screen.page(), 1);
    assert_eq!(screen.total(), 13);
    assert_eq!(screen.rows()[0].id, saved.id);
    assert!(!screen.editor().is_open());
    assert_eq!(
        screen.pagination().to_string(),
        "Showing 1 to 10 of 13 results"
    );
}

#[tokio::test]
async fn test_invalid_fund_draft_keeps_editor_open() {
    let store = Arc::new(LocalStore::in_memory());
    let mut screen = FundsScreen::open(store.clone()).await.unwrap();

    screen.open_create();
    let err = screen.save().await.unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)), "{err:?}");
    assert!(screen.editor().is_open());
    assert_eq!(store.list_funds(1, 10).await.unwrap().total, 0);
}

#[tokio::test]
async fn test_fund_update_and_delete() {
    let store = Arc::new(LocalStore::in_memory());
    let fund = store.create_fund(new_fund("Old Name")).await.unwrap();
    let mut screen = FundsScreen::open(store.clone()).await.unwrap();

    screen.open_update(&fund.id).unwrap();
    screen.draft_mut().unwrap().name = "New Name".into();
    screen.save().await.unwrap();
    assert_eq!(screen.rows()[0].name, "New Name");

    screen.delete(&fund.id).await.unwrap();
    assert!(screen.rows().is_empty());
    assert!(matches!(
        screen.view().body,
        TableBody::Empty { .. }
    ));
}

#[tokio::test]
async fn test_local_scheme_create_shows_fund_name() {
    let store = Arc::new(LocalStore::in_memory());
    let fund = store.create_fund(new_fund("Mirae Large Cap")).await.unwrap();
    let mut screen = LocalSchemesScreen::open(store.clone()).await.unwrap();

    screen.open_create(fund.id.clone());
    screen.draft_mut().unwrap().name = "Direct Growth".into();
    screen.save().await.expect("save failed");

    assert_eq!(screen.rows().len(), 1);
    assert_eq!(screen.rows()[0].fund_name.as_deref(), Some("Mirae Large Cap"));
}

// ===================================================================
// Data loader
// ===================================================================

#[tokio::test]
async fn test_json_import_report_and_progress() {
    let store = Arc::new(LocalStore::in_memory());
    let loader = DataLoader::new(store.clone());
    let seen = Mutex::new(Vec::<Progress>::new());

    let report = loader
        .import_str(
            r#"{"funds": [
                {"name": "Bluechip", "amc": "HDFC AMC", "aum": 1200, "schemes": [
                    {"name": "Direct Growth", "nav": 54.2, "riskLevel": "High"},
                    {"name": "Odd One", "riskLevel": "Extreme"}
                ]},
                {"name": "Broken", "amc": "", "schemes": [{"name": "Orphan"}]}
            ]}"#,
            ImportFormat::Json,
            |progress| seen.lock().unwrap().push(progress),
        )
        .await
        .expect("import failed");

    assert_eq!((report.success, report.failed), (2, 3));
    assert_eq!(report.errors.len(), 3);
    assert!(report.errors[0].contains("Odd One"));

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen.last().map(Progress::percent), Some(100));

    let schemes = store.list_schemes(1, 10).await.unwrap();
    assert_eq!(schemes.total, 1);
    assert_eq!(schemes.data[0].fund_name.as_deref(), Some("Bluechip"));
}

#[tokio::test]
async fn test_csv_file_import() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("funds.csv");
    std::fs::write(
        &file,
        "fund,amc,scheme,nav,category,aum,riskLevel,type\n\
         Bluechip,HDFC AMC,Direct Growth,54.2,Equity,1200,High,Open Ended\n\
         Bluechip,HDFC AMC,Regular Growth,50.1,,,,\n\
         Liquid,Axis AMC,Direct,not-a-number,,,,\n",
    )
    .unwrap();

    let store = Arc::new(LocalStore::in_memory());
    let report = DataLoader::new(store.clone())
        .import_file(&file, |_| {})
        .await
        .expect("import failed");

    assert_eq!((report.success, report.failed), (3, 1));
    assert!(report.errors[0].starts_with("line 4:"));
    assert_eq!(store.list_funds(1, 10).await.unwrap().total, 1);
    assert_eq!(store.list_schemes(1, 10).await.unwrap().total, 2);
}

#[tokio::test]
async fn test_unsupported_import_file() {
    let store = Arc::new(LocalStore::in_memory());
    let err = DataLoader::new(store)
        .import_file("funds.xlsx", |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)), "{err:?}");
}
