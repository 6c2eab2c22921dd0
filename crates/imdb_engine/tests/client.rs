use std::sync::{Arc, Mutex};
use std::time::Duration;

use imdb_core::RoleCredits;
use imdb_engine::{
    ClientSettings, FailureKind, FetchError, FetchOutput, FetchSettings, Fetcher, ImdbClient,
    PageError, ScrapeError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn next_data_page(data: &Value) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>IMDb</title></head><body>
<div id="__next"></div>
<script id="__NEXT_DATA__" type="application/json">{data}</script>
</body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn title_document(title: &str) -> Value {
    json!({"props": {"pageProps": {
        "aboveTheFoldData": {
            "originalTitleText": {"text": title},
            "titleType": {"isSeries": false},
            "principalCredits": [{"credits": [{"name": {"nameText": {"text": "Christopher Nolan"}}}]}]
        },
        "mainColumnData": {"cast": {"edges": []}}
    }}})
}

fn search_document(ids: &[&str]) -> Value {
    let results: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
    json!({"props": {"pageProps": {"titleResults": {"results": results}}}})
}

fn client_for(server: &MockServer, settings: ClientSettings) -> ImdbClient {
    ImdbClient::with_reqwest(
        FetchSettings::default(),
        ClientSettings {
            base_url: server.uri(),
            ..settings
        },
    )
    .expect("client builds")
}

async fn mount_title(server: &MockServer, id: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/title/{id}/")))
        .respond_with(html(next_data_page(&title_document(title))))
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, query: &str, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/find/"))
        .and(query_param("q", query))
        .respond_with(html(next_data_page(&search_document(ids))))
        .mount(server)
        .await;
}

#[test]
fn urls_are_built_with_encoding() {
    let client = ImdbClient::with_reqwest(FetchSettings::default(), ClientSettings::default())
        .expect("client builds");
    assert_eq!(
        client.search_url("the dark knight & co").unwrap().as_str(),
        "https://m.imdb.com/find/?q=the+dark+knight+%26+co"
    );
    assert_eq!(
        client.title_url("tt0372784").unwrap().as_str(),
        "https://m.imdb.com/title/tt0372784/"
    );
    assert_eq!(
        client.title_url("tt1/../x").unwrap().as_str(),
        "https://m.imdb.com/title/tt1%2F..%2Fx/"
    );
}

#[test]
fn unusable_base_url_is_reported() {
    let client = ImdbClient::with_reqwest(
        FetchSettings::default(),
        ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        },
    )
    .expect("client builds");
    assert!(matches!(
        client.title_url("tt1"),
        Err(ScrapeError::InvalidUrl { .. })
    ));
}

#[tokio::test]
async fn search_returns_upstream_results() {
    let server = MockServer::start().await;
    mount_search(&server, "batman", &["tt0372784", "tt0096895"]).await;

    let client = client_for(&server, ClientSettings::default());
    let results = client.search("batman").await.unwrap();
    assert_eq!(results, vec![json!({"id": "tt0372784"}), json!({"id": "tt0096895"})]);
}

#[tokio::test]
async fn title_is_fetched_and_extracted() {
    let server = MockServer::start().await;
    mount_title(&server, "tt0372784", "Batman Begins").await;

    let client = client_for(&server, ClientSettings::default());
    let record = client.title("tt0372784").await.unwrap();
    assert_eq!(record.imdb_id, "tt0372784");
    assert_eq!(record.details.title_text, "Batman Begins");
    let RoleCredits::Movie(credits) = record.credits else {
        panic!("expected movie credits");
    };
    assert_eq!(credits.director, "Christopher Nolan");
    assert_eq!(credits.writer, "N/A");
}

#[tokio::test]
async fn page_without_data_marker_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/title/tt1/"))
        .respond_with(html("<html><body><script>var x = 1;</script></body></html>".into()))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.title("tt1").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Page(PageError::MissingDataMarker)));
    assert_eq!(err.to_string(), "Script tag with id '__NEXT_DATA__' not found.");
}

#[tokio::test]
async fn data_marker_with_wrong_type_is_not_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/title/tt1/"))
        .respond_with(html(
            r#"<html><body><script id="__NEXT_DATA__">{"props": {}}</script></body></html>"#.into(),
        ))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.title("tt1").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Page(PageError::MissingDataMarker)));
}

#[tokio::test]
async fn malformed_page_data_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/title/tt1/"))
        .respond_with(html(
            r#"<html><body><script id="__NEXT_DATA__" type="application/json">{"props": </script></body></html>"#
                .into(),
        ))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.title("tt1").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Page(PageError::MalformedJson(_))));
}

#[tokio::test]
async fn page_that_is_not_a_title_fails_record_level() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/title/tt1/"))
        .respond_with(html(next_data_page(&json!({"props": {"pageProps": {}}}))))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let err = client.title("tt1").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Extract(_)));
}

#[tokio::test]
async fn upstream_error_status_is_a_fetch_error() {
    let server = MockServer::start().await;
    let client = client_for(&server, ClientSettings::default());

    let err = client.search("nothing mounted").await.unwrap_err();
    match &err {
        ScrapeError::Fetch(fetch) => assert_eq!(fetch.kind, FailureKind::HttpStatus(404)),
        other => panic!("expected fetch error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("Request failed: http status 404"));
}

#[tokio::test]
async fn full_info_skips_failed_items_and_keeps_order() {
    let server = MockServer::start().await;
    mount_search(&server, "batman", &["tt0372784", "ttBAD", "tt0096895"]).await;
    // The first result answers last, so completion order differs from search order.
    Mock::given(method("GET"))
        .and(path("/title/tt0372784/"))
        .respond_with(
            html(next_data_page(&title_document("Batman Begins")))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_title(&server, "tt0096895", "Batman").await;
    Mock::given(method("GET"))
        .and(path("/title/ttBAD/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    let records = client.search_full_info("batman").await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.imdb_id.as_str()).collect();
    assert_eq!(ids, vec!["tt0372784", "tt0096895"]);
}

#[tokio::test]
async fn full_info_skips_results_without_id_and_respects_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/find/"))
        .respond_with(html(next_data_page(&json!({"props": {"pageProps": {"titleResults": {"results": [
            {"titleNameText": "no id"},
            {"id": "tt1"},
            {"id": "tt2"},
            {"id": "tt3"}
        ]}}}}))))
        .mount(&server)
        .await;
    for id in ["tt1", "tt2", "tt3"] {
        mount_title(&server, id, id).await;
    }

    let client = client_for(
        &server,
        ClientSettings {
            full_info_limit: 2,
            full_info_concurrency: 1,
            ..ClientSettings::default()
        },
    );
    let records = client.search_full_info("anything").await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.imdb_id.as_str()).collect();
    assert_eq!(ids, vec!["tt1", "tt2"]);
}

#[tokio::test]
async fn full_info_fails_when_search_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/find/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, ClientSettings::default());
    assert!(client.search_full_info("batman").await.is_err());
}

/// Serves canned pages by URL suffix and records what was requested.
struct StubFetcher {
    pages: Vec<(String, Value)>,
    requested: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        let (_, data) = self
            .pages
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .ok_or_else(|| FetchError {
                kind: FailureKind::HttpStatus(404),
                message: url.to_string(),
            })?;
        Ok(FetchOutput {
            bytes: next_data_page(data).into_bytes(),
            final_url: url.to_string(),
            content_type: Some("text/html".to_string()),
        })
    }
}

#[tokio::test]
async fn client_works_over_any_fetcher() {
    let stub = Arc::new(StubFetcher {
        pages: vec![
            ("/find/?q=memento".to_string(), search_document(&["tt0209144"])),
            ("/title/tt0209144/".to_string(), title_document("Memento")),
        ],
        requested: Mutex::new(Vec::new()),
    });
    let client = ImdbClient::new(stub.clone(), ClientSettings::default());

    let records = client.search_full_info("memento").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].details.title_text, "Memento");
    assert_eq!(
        *stub.requested.lock().unwrap(),
        vec![
            "https://m.imdb.com/find/?q=memento".to_string(),
            "https://m.imdb.com/title/tt0209144/".to_string(),
        ]
    );
}
