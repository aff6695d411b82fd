//! Integration tests for the fetch → parse → filter pipeline.
//!
//! Each test serves its own feed document from a wiremock server and checks
//! the serialized result shape a tool caller would see.

use pretty_assertions::assert_eq;
use rss_feed_search::feed::{search_feed, FetchOptions, SearchResult};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(body: String) -> (MockServer, String) {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("Content-Type", "application/rss+xml"),
        )
        .mount(&mock_server)
        .await;
    let url = format!("{}/feed", mock_server.uri());
    (mock_server, url)
}

fn rss_with_items(count: usize) -> String {
    let items: String = (0..count)
        .map(|i| {
            format!(
                "<item><title>Cloud post {i}</title><link>https://example.com/{i}</link>\
                 <description>Google Cloud news {i}</description></item>"
            )
        })
        .collect();
    format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>T</title>{items}</channel></rss>"#)
}

async fn search(url: &str, query: &str, max_results: i64) -> Value {
    let client = reqwest::Client::new();
    let result = search_feed(&client, url, query, max_results, &FetchOptions::default()).await;
    serde_json::to_value(&result).unwrap()
}

// ============================================================================
// Matching
// ============================================================================

#[tokio::test]
async fn test_query_is_case_insensitive() {
    let body = r#"<rss version="2.0"><channel>
        <item><title>google cloud update</title><link>https://example.com/a</link></item>
    </channel></rss>"#;
    let (_server, url) = serve(body.to_string()).await;

    let results = search(&url, "GOOGLE", 5).await;
    assert_eq!(results[0]["title"], "google cloud update");
}

#[tokio::test]
async fn test_empty_query_returns_every_entry_up_to_cap() {
    let (_server, url) = serve(rss_with_items(4)).await;

    let results = search(&url, "", 10).await;
    assert_eq!(results.as_array().unwrap().len(), 4);

    let results = search(&url, "", 2).await;
    assert_eq!(results.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_cap_returns_first_matches_in_document_order() {
    let (_server, url) = serve(rss_with_items(10)).await;

    let results = search(&url, "cloud", 3).await;
    let titles: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Cloud post 0", "Cloud post 1", "Cloud post 2"]);
}

#[tokio::test]
async fn test_description_match_counts() {
    let (_server, url) = serve(rss_with_items(3)).await;

    let results = search(&url, "news 1", 5).await;
    assert_eq!(
        results,
        json!([{
            "title": "Cloud post 1",
            "link": "https://example.com/1",
            "description": "Google Cloud news 1"
        }])
    );
}

// ============================================================================
// Result shapes
// ============================================================================

#[tokio::test]
async fn test_no_match_returns_message() {
    let (_server, url) = serve(rss_with_items(3)).await;

    let results = search(&url, "kubernetes", 5).await;
    assert_eq!(results, json!([{ "message": "no matching entries found." }]));
}

#[tokio::test]
async fn test_non_positive_max_results_returns_message() {
    let (_server, url) = serve(rss_with_items(3)).await;

    for max_results in [0, -1, -100] {
        let results = search(&url, "", max_results).await;
        assert_eq!(results, json!([{ "message": "no matching entries found." }]));
    }
}

#[tokio::test]
async fn test_missing_link_defaults_to_empty_string() {
    let body = r#"<rss version="2.0"><channel>
        <item><title>No link here</title><description>text</description></item>
    </channel></rss>"#;
    let (_server, url) = serve(body.to_string()).await;

    let results = search(&url, "no link", 5).await;
    assert_eq!(
        results,
        json!([{ "title": "No link here", "link": "", "description": "text" }])
    );
}

#[tokio::test]
async fn test_youtube_atom_feed() {
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <title>Google Cloud Tech</title>
 <entry>
  <id>yt:video:v1</id>
  <title>What is Cloud Run?</title>
  <link rel="alternate" href="https://www.youtube.com/watch?v=v1"/>
  <updated>2024-05-01T00:00:00+00:00</updated>
  <media:group><media:description>Serverless containers explained.</media:description></media:group>
 </entry>
 <entry>
  <id>yt:video:v2</id>
  <title>BigQuery tips</title>
  <link rel="alternate" href="https://www.youtube.com/watch?v=v2"/>
  <updated>2024-05-02T00:00:00+00:00</updated>
  <media:group><media:description>Faster SQL.</media:description></media:group>
 </entry>
</feed>"#;
    let (_server, url) = serve(body.to_string()).await;

    let results = search(&url, "serverless", 5).await;
    assert_eq!(
        results,
        json!([{
            "title": "What is Cloud Run?",
            "link": "https://www.youtube.com/watch?v=v1",
            "description": "Serverless containers explained."
        }])
    );
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_malformed_feed_still_searched() {
    let body = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <item><title>Recovered cloud entry</title><link>https://example.com/r</link></item>
    <item><title>Broken <b>cloud</i> entry</title></item>
    <item><title>Cut off"#;
    let (_server, url) = serve(body.to_string()).await;

    let results = search(&url, "cloud", 5).await;
    let array = results.as_array().unwrap();
    assert!(array.iter().all(|r| r.get("error").is_none()));
    assert_eq!(array[0]["title"], "Recovered cloud entry");
    assert_eq!(array[0]["link"], "https://example.com/r");
}

#[tokio::test]
async fn test_non_feed_body_returns_message_not_error() {
    let (_server, url) = serve("<not valid xml".to_string()).await;

    let results = search(&url, "", 5).await;
    assert_eq!(results, json!([{ "message": "no matching entries found." }]));
}

#[tokio::test]
async fn test_unreachable_url_returns_error() {
    let client = reqwest::Client::new();
    let result = search_feed(
        &client,
        "http://127.0.0.1:1/feed",
        "anything",
        5,
        &FetchOptions::default(),
    )
    .await;

    match &result {
        SearchResult::Failed(message) => assert!(!message.is_empty()),
        other => panic!("Expected Failed, got {:?}", other),
    }
    let value = serde_json::to_value(&result).unwrap();
    assert!(value[0]["error"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn test_error_status_body_is_still_searched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(404).set_body_string(rss_with_items(2)))
        .mount(&mock_server)
        .await;

    let results = search(&format!("{}/feed", mock_server.uri()), "post 1", 5).await;
    assert_eq!(
        results,
        json!([{
            "title": "Cloud post 1",
            "link": "https://example.com/1",
            "description": "Google Cloud news 1"
        }])
    );
}

#[tokio::test]
async fn test_error_status_without_body_returns_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let results = search(&format!("{}/feed", mock_server.uri()), "", 5).await;
    assert_eq!(results, json!([{ "message": "no matching entries found." }]));
}

#[tokio::test]
async fn test_timeout_returns_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(rss_with_items(1))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let options = FetchOptions {
        timeout: Duration::from_millis(200),
        ..FetchOptions::default()
    };
    let result = search_feed(
        &client,
        &format!("{}/feed", mock_server.uri()),
        "",
        5,
        &options,
    )
    .await;
    assert_eq!(result, SearchResult::Failed("Request timed out".to_string()));
}
