use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use stlouisfed_api::{CancellationToken, Client, ClientConfig, Error, QueryParams};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const API_KEY: &str = "abcdefghijklmnopqrstuvwxyz123456";

fn client(server: &MockServer) -> Client {
    Client::new(
        ClientConfig::new(API_KEY)
            .with_base_url(&server.uri())
            .without_rate_limit(),
    )
    .unwrap()
}

fn items(range: std::ops::Range<u64>) -> Vec<Value> {
    range.map(|id| json!({ "id": id })).collect()
}

fn offsets(requests: &[Request]) -> Vec<String> {
    requests
        .iter()
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "offset")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default()
        })
        .collect()
}

#[tokio::test]
async fn concrete_two_page_scenario() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/example/list"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "items": [{"id": 1}, {"id": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/example/list"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "items": [{"id": 3}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .fetch("/example/list", "items", Some(2), &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(offsets(&requests), vec!["0", "2"]);
    assert!(requests[0]
        .url
        .query()
        .unwrap()
        .starts_with(&format!("api_key={}&file_type=json&limit=2&offset=0", API_KEY)));
}

#[tokio::test]
async fn paginates_until_count_is_exhausted() {
    let server = MockServer::start().await;

    for (offset, range) in [(0, 0..1000), (1000, 1000..2000), (2000, 2000..2500)] {
        Mock::given(method("GET"))
            .and(path("/fred/category/series"))
            .and(query_param("offset", offset.to_string()))
            .and(query_param("limit", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2500,
                "offset": offset,
                "limit": 1000,
                "seriess": items(range)
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let params = QueryParams::new().with("category_id", 125);
    let records = client(&server)
        .fetch("/fred/category/series", "seriess", Some(1000), &params)
        .await
        .unwrap();

    assert_eq!(records.len(), 2500);
    assert_eq!(records[0], json!({"id": 0}));
    assert_eq!(records[2499], json!({"id": 2499}));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(offsets(&requests), vec!["0", "1000", "2000"]);
}

#[tokio::test]
async fn short_page_stops_even_if_count_says_more() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/tags"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 10, "tags": items(0..3)
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fred/tags"))
        .and(query_param("offset", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 10, "tags": items(3..5)
        })))
        .mount(&server)
        .await;

    let records = client(&server)
        .fetch("/fred/tags", "tags", Some(3), &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn count_below_page_size_is_a_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/sources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2, "sources": items(0..2)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .fetch("/fred/sources", "sources", Some(1000), &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn no_count_wraps_single_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geofred/series/group"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "series_group": {"title": "Per Capita Personal Income", "series_group": "882"}
        })))
        .mount(&server)
        .await;

    let records = client(&server)
        .fetch("/geofred/series/group", "series_group", None, &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(
        records,
        vec![json!({"title": "Per Capita Personal Income", "series_group": "882"})]
    );
    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap();
    assert!(!query.contains("limit="));
    assert!(!query.contains("offset="));
}

#[tokio::test]
async fn no_count_returns_list_verbatim_and_missing_key_as_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "categories": [{"id": 125, "name": "Trade Balance", "parent_id": 13}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/geofred/series/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"meta": {}})))
        .mount(&server)
        .await;

    let client = client(&server);
    let categories = client
        .fetch("/fred/category", "categories", None, &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["id"], 125);

    let data = client
        .fetch("/geofred/series/data", "meta.data", None, &QueryParams::new())
        .await
        .unwrap();
    assert!(data.is_empty());
}

#[tokio::test]
async fn nested_key_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geofred/regional/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"title": "x", "data": {"2013": [{"region": "Alabama"}]}}
        })))
        .mount(&server)
        .await;

    let data = client(&server)
        .fetch("/geofred/regional/data", "meta.data", None, &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(data, vec![json!({"2013": [{"region": "Alabama"}]})]);
}

#[tokio::test]
async fn caller_params_follow_page_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/series/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "seriess": []})))
        .mount(&server)
        .await;

    let params = QueryParams::new()
        .with("search_text", "money stock")
        .with("tag_names", vec!["usa".to_string(), "m2".to_string()]);
    client(&server)
        .fetch("/fred/series/search", "seriess", Some(1000), &params)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query().unwrap(),
        format!(
            "api_key={}&file_type=json&limit=1000&offset=0&search_text=money+stock&tag_names=usa;m2",
            API_KEY
        )
    );
}

#[tokio::test]
async fn xml_error_is_remote_protocol() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geofred/series/data"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(
            r#"<?xml version="1.0" encoding="utf-8" ?><error code="500" message="Internal Server Error"/>"#,
            "text/xml",
        ))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .fetch("/geofred/series/data", "meta.data", None, &QueryParams::new())
        .await
        .unwrap_err();
    match err {
        Error::RemoteProtocol { code, message, url } => {
            assert_eq!(code, "500");
            assert_eq!(message, "Internal Server Error");
            assert!(url.contains("/geofred/series/data?api_key="));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(client.stats().requests_failed, 1);
}

#[tokio::test]
async fn json_429_is_remote_api() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/series"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error_code": 429,
            "error_message": "Too Many Requests.  Exceeded Rate Limit"
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .fetch("/fred/series", "seriess", None, &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::RemoteApi { status: 429, code: 429, ref message, .. } if message == "Too Many Requests. Exceeded Rate Limit"
    ));
    let stats = client.stats();
    assert_eq!(stats.requests_rate_limited, 1);
    assert_eq!(stats.requests_failed, 0);
}

#[tokio::test]
async fn html_is_unexpected_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/series"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch("/fred/series", "seriess", None, &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedContentType { ref content_type, .. } if content_type == "text/html"));
}

#[tokio::test]
async fn failed_page_discards_earlier_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/tags"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 4, "tags": items(0..2)})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fred/tags"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch("/fred/tags", "tags", Some(2), &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RemoteStatus { status: 404, .. }));
}

/// Records the instant each request reaches the server.
struct Stamped {
    stamps: Arc<Mutex<Vec<Instant>>>,
    body: Value,
}

impl Respond for Stamped {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.stamps.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200).set_body_json(self.body.clone())
    }
}

#[tokio::test]
async fn rate_gate_holds_quota_across_pages() {
    let server = MockServer::start().await;
    let stamps = Arc::new(Mutex::new(Vec::new()));

    Mock::given(method("GET"))
        .and(path("/fred/releases"))
        .respond_with(Stamped {
            stamps: Arc::clone(&stamps),
            body: json!({"count": 100, "releases": [{"id": 1}]}),
        })
        .up_to_n_times(5)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fred/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 100, "releases": []})))
        .mount(&server)
        .await;

    let period = Duration::from_millis(300);
    let client = Client::new(
        ClientConfig::new(API_KEY)
            .with_base_url(&server.uri())
            .with_rate_limit(2, period),
    )
    .unwrap();

    let records = client
        .fetch("/fred/releases", "releases", Some(1), &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(records.len(), 5);

    let stamps = stamps.lock().unwrap().clone();
    assert_eq!(stamps.len(), 5);
    let tolerance = Duration::from_millis(50);
    for i in 2..stamps.len() {
        let gap = stamps[i].duration_since(stamps[i - 2]);
        assert!(
            gap + tolerance >= period,
            "requests {} and {} were {:?} apart",
            i - 2,
            i,
            gap
        );
    }
    assert!(client.stats().total_wait_secs > 0.0);
}

#[tokio::test]
async fn cancel_while_waiting_in_gate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"seriess": [{"id": "GNPCA"}]})))
        .mount(&server)
        .await;

    let client = Client::new(
        ClientConfig::new(API_KEY)
            .with_base_url(&server.uri())
            .with_rate_limit(1, Duration::from_secs(60)),
    )
    .unwrap();

    client
        .fetch("/fred/series", "seriess", None, &QueryParams::new())
        .await
        .unwrap();

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = client
        .fetch_with_cancel("/fred/series", "seriess", None, &QueryParams::new(), &token)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn cancel_during_slow_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/series"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"seriess": []}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = client(&server)
        .fetch_with_cancel("/fred/series", "seriess", None, &QueryParams::new(), &token)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn clones_share_the_gate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"seriess": []})))
        .mount(&server)
        .await;

    let client = Client::new(
        ClientConfig::new(API_KEY)
            .with_base_url(&server.uri())
            .with_rate_limit(3, Duration::from_secs(60)),
    )
    .unwrap();
    let clone = client.clone();

    client
        .fetch("/fred/series", "seriess", None, &QueryParams::new())
        .await
        .unwrap();
    clone
        .fetch("/fred/series", "seriess", None, &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(client.remaining_budget(), Some(1));
    assert_eq!(client.stats().requests_succeeded, 2);
}

#[tokio::test]
async fn server_quota_headers_are_recorded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/series"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"seriess": []}))
                .insert_header("x-rate-limit-limit", "120")
                .insert_header("x-rate-limit-remaining", "117"),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    client
        .fetch("/fred/series", "seriess", None, &QueryParams::new())
        .await
        .unwrap();

    let stats = client.stats();
    assert_eq!(stats.server_limit, Some(120));
    assert_eq!(stats.server_remaining, Some(117));
}

#[tokio::test]
async fn zero_page_size_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/example/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 3, "items": []})))
        .expect(0)
        .mount(&server)
        .await;

    let result = tokio::time::timeout(
        Duration::from_secs(3),
        client(&server).fetch("/example/list", "items", Some(0), &QueryParams::new()),
    )
    .await
    .expect("fetch should return immediately");

    match result {
        Err(Error::Validation(message)) => assert_eq!(message, "page_size must be positive"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn termination_follows_the_latest_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fred/releases"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 6, "releases": items(0..2)
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The listing shrank between requests; the new count is below a page.
    Mock::given(method("GET"))
        .and(path("/fred/releases"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "releases": items(2..4)
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fred/releases"))
        .and(query_param("offset", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 6, "releases": items(4..6)
        })))
        .expect(0)
        .mount(&server)
        .await;

    let records = client(&server)
        .fetch("/fred/releases", "releases", Some(2), &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(records, items(0..4));
    assert_eq!(offsets(&server.received_requests().await.unwrap()), vec!["0", "2"]);
}
