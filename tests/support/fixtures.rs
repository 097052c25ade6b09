//! Directory-listing fixtures served from a mock server.

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn file_entry(server: &MockServer, name: &str, content_path: &str) -> Value {
    json!({
        "type": "file",
        "name": name,
        "download_url": format!("{}{content_path}", server.uri()),
        "size": 0,
    })
}

pub fn dir_entry(server: &MockServer, name: &str, listing_path: &str) -> Value {
    json!({
        "type": "dir",
        "name": name,
        "url": format!("{}{listing_path}", server.uri()),
    })
}

pub fn listing_url(server: &MockServer, listing_path: &str) -> String {
    format!("{}{listing_path}", server.uri())
}

/// Serves `entries` as the listing at `listing_path`, expecting `hits` requests.
pub async fn mount_listing(server: &MockServer, listing_path: &str, entries: Vec<Value>, hits: u64) {
    Mock::given(method("GET"))
        .and(path(listing_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(entries)))
        .expect(hits)
        .mount(server)
        .await;
}

/// Serves `body` at `content_path`, expecting `hits` requests.
pub async fn mount_content(server: &MockServer, content_path: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(content_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(hits)
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
