//! End-to-end pagination and batch tests against a mocked 25Live API.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use r25_harvester::batch;
use r25_harvester::config::Config;
use r25_harvester::error::HarvestError;
use r25_harvester::http::create_client;
use r25_harvester::normalize::EventTypeFilter;
use r25_harvester::record::Reservation;
use r25_harvester::scrape_range;

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn test_config(base_url: String) -> Config {
    Config {
        base_url,
        username: "user".to_string(),
        password: "pass".to_string(),
        page_size: 500,
    }
}

fn xml_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/xml")
}

/// Matcher on the raw (undecoded) query string, where the relative day
/// offsets keep their `+` signs.
fn query_contains(needle: &'static str) -> impl Fn(&Request) -> bool + Send + Sync {
    move |request: &Request| request.url.query().unwrap_or("").contains(needle)
}

/// Run the blocking pagination driver off the async test runtime.
async fn scrape(
    config: Config,
    lookback: &'static str,
    lookahead: &'static str,
) -> Result<Vec<Reservation>, HarvestError> {
    tokio::task::spawn_blocking(move || {
        let client = create_client()?;
        scrape_range(
            &client,
            &config,
            lookback,
            lookahead,
            &EventTypeFilter::default(),
        )
    })
    .await
    .unwrap_or_else(|e| panic!("blocking task failed: {e}"))
}

#[tokio::test(flavor = "multi_thread")]
async fn paginates_through_all_pages_with_captured_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .and(query_contains("start_dt=+0"))
        .and(|request: &Request| !request.url.query().unwrap_or("").contains("&page="))
        .respond_with(xml_response(load_fixture("page1.xml")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .and(query_contains("paginate=key-777&page=2"))
        .respond_with(xml_response(load_fixture("page2.xml")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .and(query_contains("paginate=key-777&page=3"))
        .respond_with(xml_response(load_fixture("page3.xml")))
        .expect(1)
        .mount(&server)
        .await;

    let records = scrape(test_config(server.uri()), "+0", "+6").await.unwrap();

    // 5 records fetched across 3 pages; "Seminar" and the typeless record drop
    let ids: Vec<_> = records
        .iter()
        .map(|r| r.reservation_id.clone().unwrap())
        .collect();
    assert_eq!(ids, vec!["101", "103", "104"]);

    // Pages were requested in strictly increasing order
    let requests = server.received_requests().await.unwrap();
    let pages: Vec<Option<String>> = requests
        .iter()
        .map(|request| {
            let query = request.url.query().unwrap_or("");
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("page=").map(str::to_string))
        })
        .collect();
    assert_eq!(
        pages,
        vec![None, Some("2".to_string()), Some("3".to_string())]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn single_page_query_sends_no_continuation_request() {
    let server = MockServer::start().await;

    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<r25:reservations xmlns:r25="http://www.collegenet.com/r25">
  <r25:reservation>
    <r25:reservation_id>300</r25:reservation_id>
    <r25:event_type_name>IN-Meeting</r25:event_type_name>
  </r25:reservation>
</r25:reservations>"#;

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .respond_with(xml_response(body.to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let records = scrape(test_config(server.uri()), "+0", "+0").await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_first_page_is_an_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .respond_with(xml_response(load_fixture("empty.xml")))
        .expect(1)
        .mount(&server)
        .await;

    let records = scrape(test_config(server.uri()), "+0", "+6").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_records_on_continuation_page_aborts_the_range() {
    let server = MockServer::start().await;

    let page1 = load_fixture("page1.xml").replace("page_count=\"3\"", "page_count=\"2\"");

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .and(|request: &Request| !request.url.query().unwrap_or("").contains("&page="))
        .respond_with(xml_response(page1))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .and(query_contains("&page=2"))
        .respond_with(xml_response(load_fixture("empty.xml")))
        .mount(&server)
        .await;

    let result = scrape(test_config(server.uri()), "+0", "+6").await;
    assert!(matches!(
        result,
        Err(HarvestError::MissingElement { element, .. }) if element == "reservation"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn http_failure_aborts_the_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = scrape(test_config(server.uri()), "+0", "+6").await;
    assert!(matches!(result, Err(HarvestError::Request { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn every_request_carries_basic_auth() {
    let server = MockServer::start().await;

    // base64("user:pass")
    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(xml_response(load_fixture("empty.xml")))
        .expect(1)
        .mount(&server)
        .await;

    scrape(test_config(server.uri()), "+0", "+6").await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn batch_run_skips_failed_window_and_keeps_the_rest() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .and(query_contains("start_dt=+0"))
        .respond_with(xml_response(load_fixture("page3.xml").replace(
            "page_count=\"3\" paginate_key=\"key-777\"",
            "",
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reservations.xml"))
        .and(query_contains("start_dt=+7"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = test_config(server.uri());
    let report = tokio::task::spawn_blocking(move || {
        let client = create_client()?;
        batch::run(&client, &config, 14, 7, &EventTypeFilter::default())
    })
    .await
    .unwrap_or_else(|e| panic!("blocking task failed: {e}"))
    .unwrap();

    assert_eq!(report.total_records(), 1);
    assert_eq!(report.failed_windows.len(), 1);
    assert_eq!(report.failed_windows[0].lookback, "+7");
}
