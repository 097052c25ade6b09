//! Integration tests for full crawls against a mock listing API.
//!
//! These tests drive CrawlOrchestrator with the real HttpClient so listing
//! decoding, header handling, retries and aggregation run end to end.

use std::sync::Arc;
use std::time::Duration;

use letterfreq_core::fetch::LISTING_MEDIA_TYPE;
use letterfreq_core::{
    CrawlError, CrawlOrchestrator, FetchError, HttpClient, RetryPolicy, SuffixFilter, TreeWalker,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::fixtures::{
    dir_entry, file_entry, listing_url, mount_content, mount_listing, mount_status,
};
use support::socket_guard::start_mock_server_or_skip;

fn orchestrator_with(token: Option<&str>, policy: RetryPolicy) -> CrawlOrchestrator {
    let client = Arc::new(HttpClient::new(token.map(str::to_string)));
    let walker = TreeWalker::new(client.clone(), SuffixFilter::default())
        .with_retry_policy(policy.clone());
    CrawlOrchestrator::new(walker, client, 4, policy).unwrap()
}

fn orchestrator() -> CrawlOrchestrator {
    orchestrator_with(None, RetryPolicy::no_retry())
}

fn fast_retry_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(5), Duration::from_millis(20), 2.0)
}

#[tokio::test]
async fn test_crawl_single_file_counts_letters_case_folded() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let root = vec![file_entry(&server, "a.js", "/raw/a.js")];
    mount_listing(&server, "/contents/", root, 1).await;
    mount_content(&server, "/raw/a.js", "aAbb", 1).await;

    let result = orchestrator()
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    assert_eq!(result.get('a'), 2);
    assert_eq!(result.get('b'), 2);
    assert_eq!(result.len(), 2);
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"a": 2, "b": 2})
    );
}

#[tokio::test]
async fn test_crawl_descends_into_subdirectories() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![dir_entry(&server, "src", "/contents/src")],
        1,
    )
    .await;
    mount_listing(
        &server,
        "/contents/src",
        vec![file_entry(&server, "x.ts", "/raw/src/x.ts")],
        1,
    )
    .await;
    mount_content(&server, "/raw/src/x.ts", "ccc", 1).await;

    let result = orchestrator()
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"c":3}"#);
}

#[tokio::test]
async fn test_crawl_non_matching_file_is_never_fetched() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![file_entry(&server, "readme.md", "/raw/readme.md")],
        1,
    )
    .await;
    mount_content(&server, "/raw/readme.md", "should not be read", 0).await;

    let (result, stats) = orchestrator()
        .run_with_stats(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
    assert_eq!(stats.discovered(), 0);
}

#[tokio::test]
async fn test_crawl_failed_leaf_does_not_poison_siblings() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![
            file_entry(&server, "gone.js", "/raw/gone.js"),
            file_entry(&server, "ok.js", "/raw/ok.js"),
        ],
        1,
    )
    .await;
    mount_status(&server, "/raw/gone.js", 404).await;
    mount_content(&server, "/raw/ok.js", "zz", 1).await;

    let (result, stats) = orchestrator()
        .run_with_stats(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"z":2}"#);
    assert_eq!(stats.discovered(), 2);
    assert_eq!(stats.completed(), 1);
    assert_eq!(stats.failed(), 1);
}

#[tokio::test]
async fn test_crawl_root_listing_failure_fails_crawl() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&server, "/contents/", 500).await;

    let err = orchestrator()
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap_err();

    match err {
        CrawlError::ListingUnavailable { source, .. } => {
            assert!(matches!(source, FetchError::HttpStatus { status: 500, .. }));
        }
        other => panic!("expected ListingUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_crawl_subdirectory_listing_failure_fails_crawl() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![
            file_entry(&server, "a.js", "/raw/a.js"),
            dir_entry(&server, "lib", "/contents/lib"),
        ],
        1,
    )
    .await;
    mount_content(&server, "/raw/a.js", "abc", 0).await;
    mount_status(&server, "/contents/lib", 404).await;

    let err = orchestrator()
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::ListingUnavailable { .. }));
}

#[tokio::test]
async fn test_crawl_malformed_listing_body_fails_crawl() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/contents/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"message\":\"nope\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let err = orchestrator_with(None, fast_retry_policy())
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap_err();

    match err {
        CrawlError::ListingUnavailable { source, .. } => {
            assert!(matches!(source, FetchError::Decode { .. }));
        }
        other => panic!("expected ListingUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_crawl_skips_unrecognized_entries() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![
            json!({"type": "symlink", "name": "link.js", "target": "a.js"}),
            json!({"type": "submodule", "name": "vendor"}),
            json!({"type": "file", "name": "no-url.js"}),
            file_entry(&server, "a.js", "/raw/a.js"),
        ],
        1,
    )
    .await;
    mount_content(&server, "/raw/a.js", "Q", 1).await;

    let result = orchestrator()
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"q":1}"#);
}

#[tokio::test]
async fn test_crawl_result_sorted_by_descending_count() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![
            file_entry(&server, "one.js", "/raw/one.js"),
            file_entry(&server, "two.ts", "/raw/two.ts"),
        ],
        1,
    )
    .await;
    mount_content(&server, "/raw/one.js", "let x = yyy;", 1).await;
    mount_content(&server, "/raw/two.ts", "YYY // éé", 1).await;

    let result = orchestrator()
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    let entries = result.entries();
    assert_eq!(entries[0], ('y', 6));
    assert_eq!(entries[1], ('é', 2));
    assert!(entries.windows(2).all(|w| w[0].1 >= w[1].1));
    assert_eq!(result.total(), 6 + 2 + 1 + 1 + 1 + 1);
}

#[tokio::test]
async fn test_listing_requests_carry_accept_and_bearer_token() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/contents/"))
        .and(header("accept", LISTING_MEDIA_TYPE))
        .and(header("authorization", "Bearer ghp_test_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([file_entry(&server, "a.js", "/raw/a.js")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_content(&server, "/raw/a.js", "k", 1).await;

    let result = orchestrator_with(Some("ghp_test_token"), RetryPolicy::no_retry())
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap();
    assert_eq!(result.get('k'), 1);

    // The token is only sent to the listing API, never to content hosts.
    let requests = server.received_requests().await.unwrap();
    let content_request = requests
        .iter()
        .find(|r| r.url.path() == "/raw/a.js")
        .unwrap();
    assert!(content_request.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_listing_without_token_sends_no_authorization() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(&server, "/contents/", vec![], 1).await;

    let result = orchestrator()
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap();
    assert!(result.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_transient_content_failure_is_retried() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![file_entry(&server, "a.js", "/raw/a.js")],
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/raw/a.js"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_content(&server, "/raw/a.js", "hh", 1).await;

    let (result, stats) = orchestrator_with(None, fast_retry_policy())
        .run_with_stats(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    assert_eq!(result.get('h'), 2);
    assert_eq!(stats.completed(), 1);
    assert_eq!(stats.failed(), 0);
    assert!(stats.retried() >= 1);
}

#[tokio::test]
async fn test_transient_listing_failure_is_retried() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/contents/"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_listing(
        &server,
        "/contents/",
        vec![file_entry(&server, "a.ts", "/raw/a.ts")],
        1,
    )
    .await;
    mount_content(&server, "/raw/a.ts", "w", 1).await;

    let result = orchestrator_with(None, fast_retry_policy())
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    assert_eq!(result.get('w'), 1);
}

#[tokio::test]
async fn test_permanent_content_failure_is_not_retried() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![file_entry(&server, "a.js", "/raw/a.js")],
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/raw/a.js"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let (result, stats) = orchestrator_with(None, fast_retry_policy())
        .run_with_stats(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(stats.failed(), 1);
    assert_eq!(stats.retried(), 0);
}

#[tokio::test]
async fn test_repeated_crawls_do_not_accumulate() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![file_entry(&server, "a.js", "/raw/a.js")],
        2,
    )
    .await;
    mount_content(&server, "/raw/a.js", "mm", 2).await;

    let orchestrator = orchestrator();
    let root = listing_url(&server, "/contents/");
    let first = orchestrator.run(&root).await.unwrap();
    let second = orchestrator.run(&root).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.get('m'), 2);
}

#[tokio::test]
async fn test_non_200_success_status_is_a_failure() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(
        &server,
        "/contents/",
        vec![
            file_entry(&server, "empty.js", "/raw/empty.js"),
            file_entry(&server, "ok.js", "/raw/ok.js"),
        ],
        1,
    )
    .await;
    mount_status(&server, "/raw/empty.js", 204).await;
    mount_content(&server, "/raw/ok.js", "nn", 1).await;

    let (result, stats) = orchestrator()
        .run_with_stats(&listing_url(&server, "/contents/"))
        .await
        .unwrap();

    assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"n":2}"#);
    assert_eq!(stats.failed(), 1);
}

#[tokio::test]
async fn test_listing_with_non_200_success_status_fails_crawl() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/contents/"))
        .respond_with(ResponseTemplate::new(203).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = orchestrator()
        .run(&listing_url(&server, "/contents/"))
        .await
        .unwrap_err();

    match err {
        CrawlError::ListingUnavailable { source, .. } => {
            assert!(matches!(source, FetchError::HttpStatus { status: 203, .. }));
        }
        other => panic!("expected ListingUnavailable, got {other:?}"),
    }
}
