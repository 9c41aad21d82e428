//! Integration tests for memefetch using wiremock

use memefetch::{
    fetch_detail, fetch_listing, FetchOptions, ListingOutcome, Tool, ToolCall, DEFAULT_USER_AGENT,
};
use serde_json::json;
use std::collections::HashSet;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Newest Meme Submissions</title></head>
<body>
  <nav>
    <a href="/memes/new">New</a>
    <a href="/memes/trending">Trending</a>
    <a href="/memes/confirmed">Confirmed</a>
    <a href="/memes/categories/subculture">Subcultures</a>
  </nav>
  <table class="entry_list">
    <tr>
      <td><a class="photo" href="/memes/skibidi-toilet"><img src="a.jpg"></a></td>
      <td><a href="/memes/skibidi-toilet">Skibidi Toilet</a></td>
    </tr>
    <tr>
      <td><a class="item" href="/memes/grumpy-cat" alt="Grumpy Cat">grumpy</a></td>
    </tr>
    <tr>
      <td><a href="/memes/doge" title="Doge">such wow</a></td>
    </tr>
    <tr>
      <td><a href="/memes/distracted-boyfriend" data-author="someone"></a></td>
    </tr>
    <tr>
      <td><a href="/memes/nyan-cat">Nyan Cat</a></td>
    </tr>
  </table>
  <div class="pagination">
    <a href="/memes/page/2">2</a>
    <a href="/memes?kind=submissions&amp;page=2">Next</a>
    <a href="/memes/all?page=3">3</a>
  </div>
</body>
</html>"#;

async fn mount_listing(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/memes"))
        .and(query_param("kind", "submissions"))
        .and(query_param("sort", "newest"))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

fn tool_for(server: &MockServer) -> Tool {
    Tool::builder().origin(server.uri()).build()
}

#[tokio::test]
async fn test_listing_extracts_in_document_order() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 200, LISTING_HTML).await;

    let tool = tool_for(&mock_server);
    let outcome = tool.get_newest_memes(20).await;
    let memes = outcome.memes();

    let origin = mock_server.uri();
    let urls: Vec<String> = memes.iter().map(|m| m.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{origin}/memes/skibidi-toilet"),
            format!("{origin}/memes/grumpy-cat"),
            format!("{origin}/memes/doge"),
            format!("{origin}/memes/distracted-boyfriend"),
            format!("{origin}/memes/nyan-cat"),
        ]
    );

    let titles: Vec<&str> = memes.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Skibidi Toilet",
            "Grumpy Cat",
            "Doge",
            "someone",
            "Nyan Cat"
        ]
    );
}

#[tokio::test]
async fn test_listing_properties_hold() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 200, LISTING_HTML).await;

    let outcome = tool_for(&mock_server).get_newest_memes(50).await;
    let memes = outcome.memes();
    assert!(!memes.is_empty());

    let unique: HashSet<&str> = memes.iter().map(|m| m.url.as_str()).collect();
    assert_eq!(unique.len(), memes.len());

    for meme in memes {
        assert!(!meme.title.chars().all(char::is_numeric));
        assert!(meme.url.starts_with(&mock_server.uri()));
        let path = &meme.url[mock_server.uri().len()..];
        assert!(memefetch::extract::is_meme_link(path), "{path}");
    }
}

#[tokio::test]
async fn test_listing_limit() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 200, LISTING_HTML).await;

    let outcome = tool_for(&mock_server).get_newest_memes(3).await;
    let titles: Vec<&str> = outcome.memes().iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Skibidi Toilet", "Grumpy Cat", "Doge"]);
}

#[tokio::test]
async fn test_listing_non_200() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 403, "Forbidden").await;

    let outcome = tool_for(&mock_server).get_newest_memes(5).await;
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!([{"error": "Failed to fetch data: Status code 403"}])
    );
}

#[tokio::test]
async fn test_listing_empty_with_and_without_html() {
    let mock_server = MockServer::start().await;
    let body = "<html><body><a href=\"/memes/new\">New</a></body></html>";
    mount_listing(&mock_server, 200, body).await;

    let tool = tool_for(&mock_server);
    assert_eq!(tool.get_newest_memes(5).await, ListingOutcome::Memes(vec![]));

    let outcome = tool.get_newest_memes_with_html(5).await;
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!([{"error": "No memes found", "html": body}])
    );
}

#[tokio::test]
async fn test_browser_headers_sent() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 200, LISTING_HTML).await;
    Mock::given(method("GET"))
        .and(path("/memes/doge"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>doge</p>", "text/html"))
        .mount(&mock_server)
        .await;

    let tool = tool_for(&mock_server);
    tool.get_newest_memes(1).await;
    tool.get_meme_details("/memes/doge").await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let header = |name: &str| {
            request
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        assert_eq!(header("user-agent").as_deref(), Some(DEFAULT_USER_AGENT));
        assert_eq!(header("accept-language").as_deref(), Some("en-US,en;q=0.5"));
        assert_eq!(header("upgrade-insecure-requests").as_deref(), Some("1"));
        assert_eq!(header("cache-control").as_deref(), Some("max-age=0"));
        assert!(header("accept").unwrap().starts_with("text/html"));
    }
}

#[tokio::test]
async fn test_detail_relative_url_normalized() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/memes/example"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<h1>Example</h1>", "text/html"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let tool = tool_for(&mock_server);
    for url in ["/memes/example", "memes/example"] {
        let result = tool.get_meme_details(url).await;
        assert_eq!(result.status_code, 200);
        assert_eq!(result.url, format!("{}/memes/example", mock_server.uri()));
        assert_eq!(result.html, "<h1>Example</h1>");
        assert!(result.error.is_none());
    }
}

#[tokio::test]
async fn test_detail_404_keeps_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/memes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("<h1>Not Found</h1>", "text/html"))
        .mount(&mock_server)
        .await;

    let result = tool_for(&mock_server).get_meme_details("/memes/missing").await;
    assert_eq!(result.status_code, 404);
    assert_eq!(result.html, "<h1>Not Found</h1>");
    assert_eq!(result.error.as_deref(), Some("Failed to fetch URL: HTTP 404"));
}

#[tokio::test]
async fn test_detail_follows_redirects() {
    let mock_server = MockServer::start().await;
    let target = format!("{}/memes/doge", mock_server.uri());
    Mock::given(method("GET"))
        .and(path("/memes/shibe"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/memes/doge"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>wow</p>", "text/html"))
        .mount(&mock_server)
        .await;

    let result = tool_for(&mock_server).get_meme_details("/memes/shibe").await;
    assert_eq!(result.status_code, 200);
    assert_eq!(result.url, target);
    assert_eq!(result.html, "<p>wow</p>");
}

#[tokio::test]
async fn test_transport_failure() {
    // Bind then release a port so nothing is listening on it
    let origin = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let tool = Tool::builder().origin(origin.clone()).build();

    let result = tool.get_meme_details("/memes/doge").await;
    assert_eq!(result.html, "");
    assert_eq!(result.status_code, 0);
    assert_eq!(result.url, format!("{origin}/memes/doge"));
    assert!(result.error.unwrap().starts_with("Request error: "));

    let outcome = fetch_listing(5, true, tool.options()).await;
    assert!(outcome.error().unwrap().starts_with("Request error: "));
    assert!(outcome.memes().is_empty());
}

#[tokio::test]
async fn test_malformed_url_reports_cause() {
    let result = fetch_detail("http//not-a-url", &FetchOptions::default()).await;
    assert_eq!(result.html, "");
    assert_eq!(result.status_code, 0);
    assert_eq!(result.url, "http//not-a-url");

    let error = result.error.unwrap();
    assert!(error.starts_with("Request error: "), "{error}");
    assert_ne!(error, "Request error: failed to create HTTP client");
    assert!(error.contains("relative URL without a base"), "{error}");
}

#[tokio::test]
async fn test_fetch_detail_absolute_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/memes/doge"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>doge</p>", "text/html"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/memes/doge", mock_server.uri());
    let result = fetch_detail(&url, &Default::default()).await;
    assert_eq!(result.status_code, 200);
    assert_eq!(result.url, url);
}

#[tokio::test]
async fn test_dispatch_envelopes() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 200, LISTING_HTML).await;
    Mock::given(method("GET"))
        .and(path("/memes/doge"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>doge</p>", "text/html"))
        .mount(&mock_server)
        .await;

    let tool = tool_for(&mock_server);

    let response = tool.dispatch("get_newest_memes", &json!({"limit": 2})).await;
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"].as_array().unwrap().len(), 2);

    // default limit is 5
    let response = tool.dispatch("get_newest_memes", &json!({})).await;
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["data"].as_array().unwrap().len(), 5);

    let call: ToolCall = serde_json::from_value(json!({
        "action": "get_meme_details",
        "params": {"url": "/memes/doge"}
    }))
    .unwrap();
    let value = serde_json::to_value(tool.call(&call).await).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["status_code"], 200);
    assert_eq!(value["data"]["html"], "<p>doge</p>");
    assert!(value["data"].get("error").is_none());
}

#[tokio::test]
async fn test_dispatch_missing_url_sends_nothing() {
    let mock_server = MockServer::start().await;
    let tool = tool_for(&mock_server);

    let response = tool.dispatch("get_meme_details", &json!({})).await;
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["status"], "error");
    assert!(value["message"].as_str().unwrap().contains("URL"));
    assert!(value.get("data").is_none());

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
