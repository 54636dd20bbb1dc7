//! End-to-end tests: a mocked Solr core behind the federated search routes.
//!
//! Uses wiremock for the Solr select handler and drives the axum router
//! directly with `oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use solr_opensearch::config::Settings;
use solr_opensearch::feed::RequiredFieldMode;
use solr_opensearch::network::HttpClient;
use solr_opensearch::web::{create_router, AppState, ATOM_CONTENT_TYPE};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SELECT_PATH: &str = "/solr/emails/select";

fn settings_for(server: &MockServer, mode: RequiredFieldMode) -> Settings {
    let mut settings = Settings::default();
    settings.solr.base_url = format!("{}/solr", server.uri());
    settings.server.base_url = Some("https://search.example.com".to_string());
    settings.mapping.mode = mode;
    settings
}

fn app(settings: Settings) -> axum::Router {
    let client = HttpClient::with_settings(&settings.outgoing).unwrap();
    create_router(AppState::new(settings, client).unwrap())
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

fn scientist_doc() -> Value {
    json!({
        "id": "b3249981-5b34-4b5b-9d0e-8d3f2c1a7e60",
        "subject": ["Congress dog determine relate admit win trade."],
        "body": ["Whose scientist thought arm. Between final plan nation."],
        "sender": ["james70@example.net"],
        "date": "2024-09-14T23:16:18Z",
        "receivers": [
            "ycarter@example.org",
            "bsmith@example.com",
            "tracy43@example.net",
            "pamela12@example.org",
            "jwilliams@example.com"
        ],
        "tags": ["finance", "urgent", "legal", "review", "q3"]
    })
}

fn select_body(num_found: u64, start: u64, docs: Vec<Value>) -> Value {
    json!({
        "responseHeader": { "status": 0, "QTime": 1 },
        "response": { "numFound": num_found, "start": start, "docs": docs }
    })
}

#[tokio::test]
async fn test_scientist_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SELECT_PATH))
        .and(query_param("q", "scientist"))
        .and(query_param("start", "0"))
        .and(query_param("rows", "10"))
        .and(query_param("wt", "json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(select_body(1, 0, vec![scientist_doc()])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = app(settings_for(&server, RequiredFieldMode::Strict));
    let (status, content_type, xml) = get(app, "/search?q=scientist&start=&count=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(ATOM_CONTENT_TYPE));
    assert!(xml.contains("<opensearch:totalResults>1</opensearch:totalResults>"));
    assert!(xml.contains("<opensearch:startIndex>0</opensearch:startIndex>"));
    assert!(xml.contains("<opensearch:itemsPerPage>10</opensearch:itemsPerPage>"));
    assert!(xml.contains("<title>Congress dog determine relate admit win trade.</title>"));
    assert!(xml.contains("<summary>Congress dog determine relate admit win trade.</summary>"));
    assert!(xml.contains("<id>b3249981-5b34-4b5b-9d0e-8d3f2c1a7e60</id>"));
    assert!(xml.contains("<updated>2024-09-14T23:16:18Z</updated>"));
    assert!(xml.contains("<sfdc:emaildate>2024-09-14T23:16:18Z</sfdc:emaildate>"));
    assert!(xml.contains(
        "<sfdc:receivers>ycarter@example.orgbsmith@example.comtracy43@example.netpamela12@example.orgjwilliams@example.com</sfdc:receivers>"
    ));
    assert!(xml.contains("<sfdc:tags>financeurgentlegalreviewq3</sfdc:tags>"));
}

#[tokio::test]
async fn test_json_format_and_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SELECT_PATH))
        .and(query_param("start", "20"))
        .and(query_param("rows", "5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(select_body(21, 20, vec![scientist_doc()])),
        )
        .mount(&server)
        .await;

    let app = app(settings_for(&server, RequiredFieldMode::Strict));
    let (status, _, body) = get(app, "/search?q=scientist&start=20&count=5&format=json").await;

    assert_eq!(status, StatusCode::OK);
    let feed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(feed["totalResults"], 21);
    assert_eq!(feed["startIndex"], 20);
    assert_eq!(feed["itemsPerPage"], 5);
    assert_eq!(feed["searchTerms"], "scientist");
    assert_eq!(feed["entries"][0]["extension"]["recordType"], "Email");
}

#[tokio::test]
async fn test_strict_mode_rejects_page() {
    let server = MockServer::start().await;
    let mut bad = scientist_doc();
    bad.as_object_mut().unwrap().remove("sender");

    Mock::given(method("GET"))
        .and(path(SELECT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(select_body(2, 0, vec![scientist_doc(), bad])),
        )
        .mount(&server)
        .await;

    let app = app(settings_for(&server, RequiredFieldMode::Strict));
    let (status, _, body) = get(app, "/search?q=scientist").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("sender"));
    assert!(!body.contains("<feed"));
}

#[tokio::test]
async fn test_lenient_mode_skips_record() {
    let server = MockServer::start().await;
    let mut bad = scientist_doc();
    bad.as_object_mut().unwrap().remove("sender");
    bad["id"] = json!("broken");

    Mock::given(method("GET"))
        .and(path(SELECT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(select_body(2, 0, vec![bad, scientist_doc()])),
        )
        .mount(&server)
        .await;

    let app = app(settings_for(&server, RequiredFieldMode::Lenient));
    let (status, _, xml) = get(app.clone(), "/search?q=scientist").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(xml.matches("<entry>").count(), 1);
    assert!(!xml.contains("<id>broken</id>"));
    // Upstream counts are kept
    assert!(xml.contains("<opensearch:totalResults>2</opensearch:totalResults>"));
    assert!(xml.contains("<opensearch:itemsPerPage>10</opensearch:itemsPerPage>"));

    let (_, _, stats) = get(app, "/stats").await;
    let stats: Value = serde_json::from_str(&stats).unwrap();
    assert_eq!(stats["total_searches"], 1);
    assert_eq!(stats["records_skipped"], 1);
    assert_eq!(stats["entries_emitted"], 1);
}

#[tokio::test]
async fn test_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SELECT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "msg": "core is loading", "code": 500 }
        })))
        .mount(&server)
        .await;

    let app = app(settings_for(&server, RequiredFieldMode::Strict));
    let (status, _, body) = get(app.clone(), "/search?q=scientist").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("core is loading"));
    assert!(!body.contains("<feed"));

    let (_, _, stats) = get(app, "/stats").await;
    let stats: Value = serde_json::from_str(&stats).unwrap();
    assert_eq!(stats["upstream_failures"], 1);
}

#[tokio::test]
async fn test_bad_request_never_reaches_solr() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SELECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(select_body(0, 0, vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let app = app(settings_for(&server, RequiredFieldMode::Strict));
    let (status, _, _) = get(app.clone(), "/search?q=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(app, "/search?q=dog&start=minus-one").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_description_matches_feed_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SELECT_PATH))
        .and(query_param("start", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(select_body(1, 0, vec![scientist_doc()])),
        )
        .mount(&server)
        .await;

    let app = app(settings_for(&server, RequiredFieldMode::Strict));

    let (status, content_type, description) = get(app.clone(), "/opensearch.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type
        .unwrap()
        .starts_with("application/opensearchdescription+xml"));
    assert!(description.contains(
        "template=\"https://search.example.com/search?q={searchTerms}&amp;start={startIndex?}&amp;count={count?}\""
    ));
    assert!(description.contains("indexOffset=\"0\""));

    // Fill the template the way a consumer asking for the first page would
    let (_, _, feed) = get(app, "/search?q=scientist&start=0&count=10").await;
    assert!(feed.contains("<opensearch:startIndex>0</opensearch:startIndex>"));
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let app = app(settings_for(&server, RequiredFieldMode::Strict));
    let (status, _, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["executor"], "solr");
}
