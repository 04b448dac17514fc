//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use domain_harvester::config::{AuthConfig, CrawlerConfig};
use domain_harvester::crawler::Sleeper;
use domain_harvester::Crawler;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Paragraph long enough to pass the content threshold
const LONG_TEXT: &str =
    "This page carries enough readable prose to be kept as a harvested document.";

/// Records every requested pause instead of sleeping
#[derive(Debug, Clone, Default)]
struct RecordingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    fn calls(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.calls.lock().unwrap().push(duration);
        std::future::ready(())
    }
}

/// Creates crawler settings for `seed` with no pacing
fn create_test_config(seed: &str, max_pages: u32) -> CrawlerConfig {
    let mut config = CrawlerConfig::new(seed);
    config.max_pages = max_pages;
    config.delay_ms = 0;
    config.timeout_secs = 5;
    config.connect_timeout_secs = 2;
    config
}

/// Builds an HTML page with a paragraph of `text` and anchors for `links`
fn html_page(text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>Test</title></head><body><p>{}</p>{}</body></html>",
        text, anchors
    )
}

/// Mounts a GET handler serving `body` as HTML at `route`
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

/// Paths the server saw, in arrival order
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_basic_crawl_stays_on_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/a",
        html_page(LONG_TEXT, &[&format!("{}/b", base), "https://other.com/c"]),
    )
    .await;
    mount_page(&server, "/b", html_page(LONG_TEXT, &[])).await;

    let crawler = Crawler::new(&create_test_config(&format!("{}/a", base), 10), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(requested_paths(&server).await, vec!["/a", "/b"]);
    assert_eq!(report.stats.pages_visited, 2);

    let sources: Vec<&str> = report.documents.iter().map(|d| d.source()).collect();
    assert_eq!(sources, vec![format!("{}/a", base), format!("{}/b", base)]);
    assert!(report.documents.iter().all(|d| d.content().contains("harvested document")));
}

#[tokio::test]
async fn test_max_pages_one_fetches_only_seed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(LONG_TEXT, &["/one", "/two", "/three"]),
    )
    .await;
    mount_page(&server, "/one", html_page(LONG_TEXT, &[])).await;

    let crawler = Crawler::new(&create_test_config(&server.uri(), 1), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(requested_paths(&server).await, vec!["/"]);
    assert_eq!(report.stats.pages_visited, 1);
    assert!(report.documents.len() <= 1);
}

#[tokio::test]
async fn test_failing_seed_terminates_cleanly() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert!(report.documents.is_empty());
    assert_eq!(report.stats.pages_visited, 1);
    assert_eq!(report.stats.failed_pages, 1);
    assert_eq!(report.stats.failures_by_kind.get("http_status"), Some(&1));
}

#[tokio::test]
async fn test_thin_page_links_still_followed() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Short.", &["/long"])).await;
    mount_page(&server, "/long", html_page(LONG_TEXT, &[])).await;

    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(requested_paths(&server).await, vec!["/", "/long"]);
    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.documents[0].source(), format!("{}/long", server.uri()));
    assert_eq!(report.stats.thin_pages, 1);
}

#[tokio::test]
async fn test_fragment_links_not_revisited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page(LONG_TEXT, &["#top", "/a#intro", "/b", "/b#x"]), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html_page(LONG_TEXT, &["/a", "/b"]), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/a", server.uri());
    let crawler = Crawler::new(&create_test_config(&seed, 10), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(report.stats.pages_visited, 2);
    assert_eq!(report.documents.len(), 2);
    // Wiremock verifies the expect(1) counts when the server drops
}

#[tokio::test]
async fn test_budget_bounds_visits() {
    let server = MockServer::start().await;

    // Every page links to ten others, far more than the budget allows
    for i in 0..20 {
        let links: Vec<String> = (0..10).map(|j| format!("/p{}", (i + j + 1) % 20)).collect();
        let refs: Vec<&str> = links.iter().map(String::as_str).collect();
        mount_page(&server, &format!("/p{}", i), html_page(LONG_TEXT, &refs)).await;
    }

    let seed = format!("{}/p0", server.uri());
    let crawler = Crawler::new(&create_test_config(&seed, 5), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    let paths = requested_paths(&server).await;
    assert_eq!(paths.len(), 5);
    assert_eq!(report.stats.pages_visited, 5);

    let mut unique = paths.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), paths.len(), "A page was fetched twice: {:?}", paths);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page(LONG_TEXT, &["/1", "/2"])).await;
    mount_page(&server, "/1", html_page(LONG_TEXT, &["/1a"])).await;
    mount_page(&server, "/2", html_page(LONG_TEXT, &["/2a"])).await;
    mount_page(&server, "/1a", html_page(LONG_TEXT, &[])).await;
    mount_page(&server, "/2a", html_page(LONG_TEXT, &[])).await;

    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), AuthConfig::None)
        .expect("Failed to create crawler");
    crawler.crawl().await.expect("Crawl failed");

    assert_eq!(
        requested_paths(&server).await,
        vec!["/", "/1", "/2", "/1a", "/2a"]
    );
}

#[tokio::test]
async fn test_page_failure_does_not_abort_crawl() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page(LONG_TEXT, &["/missing", "/good"])).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(&server, "/good", html_page(LONG_TEXT, &[])).await;

    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(requested_paths(&server).await, vec!["/", "/missing", "/good"]);
    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.stats.failed_pages, 1);
    assert_eq!(report.stats.pages_visited, 3);
}

#[tokio::test]
async fn test_non_html_response_skipped() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page(LONG_TEXT, &["/feed"])).await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2, 3], "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.stats.failures_by_kind.get("content_mismatch"), Some(&1));
}

#[tokio::test]
async fn test_other_port_is_other_domain() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(LONG_TEXT, &[&format!("{}/elsewhere", other.uri())]),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html_page(LONG_TEXT, &[]), "text/html"))
        .expect(0)
        .mount(&other)
        .await;

    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(report.stats.pages_visited, 1);
}

#[tokio::test]
async fn test_off_domain_redirect_not_harvested() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(&server, "/", html_page(LONG_TEXT, &["/go"])).await;
    Mock::given(method("GET"))
        .and(path("/go"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/offsite", other.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                html_page("OFFSITE CONTENT from a different host that must never be kept.", &[]),
                "text/html",
            ),
        )
        .expect(0)
        .mount(&other)
        .await;

    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(report.documents.len(), 1);
    assert!(report.documents.iter().all(|d| !d.content().contains("OFFSITE")));
    assert_eq!(report.stats.failures_by_kind.get("off_domain_redirect"), Some(&1));
    assert!(other.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_redirected_page_links_resolve_against_final_url() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page(LONG_TEXT, &["/old"])).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new/page"))
        .mount(&server)
        .await;
    mount_page(&server, "/new/page", html_page(LONG_TEXT, &["sibling"])).await;
    mount_page(&server, "/new/sibling", html_page(LONG_TEXT, &[])).await;

    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), AuthConfig::None)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(
        requested_paths(&server).await,
        vec!["/", "/old", "/new/page", "/new/sibling"]
    );
    assert_eq!(report.documents.len(), 3);
    // The document keeps the URL the crawl asked for
    assert_eq!(report.documents[1].source(), format!("{}/old", server.uri()));
}

#[tokio::test]
async fn test_delay_between_pages() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page(LONG_TEXT, &["/1", "/2"])).await;
    mount_page(&server, "/1", html_page(LONG_TEXT, &[])).await;
    mount_page(&server, "/2", html_page(LONG_TEXT, &[])).await;

    let mut config = create_test_config(&server.uri(), 10);
    config.delay_ms = 250;

    let sleeper = RecordingSleeper::default();
    let crawler = Crawler::new(&config, AuthConfig::None)
        .expect("Failed to create crawler")
        .with_sleeper(sleeper.clone());
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(report.stats.pages_visited, 3);
    // No pause after the final page
    assert_eq!(sleeper.calls(), vec![Duration::from_millis(250); 2]);
}

#[tokio::test]
async fn test_zero_delay_never_sleeps() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page(LONG_TEXT, &["/1"])).await;
    mount_page(&server, "/1", html_page(LONG_TEXT, &[])).await;

    let sleeper = RecordingSleeper::default();
    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), AuthConfig::None)
        .expect("Failed to create crawler")
        .with_sleeper(sleeper.clone());
    crawler.crawl().await.expect("Crawl failed");

    assert!(sleeper.calls().is_empty());
}

#[tokio::test]
async fn test_delay_holds_wall_clock() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page(LONG_TEXT, &["/1", "/2"])).await;
    mount_page(&server, "/1", html_page(LONG_TEXT, &[])).await;
    mount_page(&server, "/2", html_page(LONG_TEXT, &[])).await;

    let mut config = create_test_config(&server.uri(), 10);
    config.delay_ms = 50;

    let start = Instant::now();
    let report = Crawler::new(&config, AuthConfig::None)
        .expect("Failed to create crawler")
        .crawl()
        .await
        .expect("Crawl failed");

    let expected = Duration::from_millis(50) * (report.stats.pages_visited as u32 - 1);
    assert!(start.elapsed() >= expected);
}

#[tokio::test]
async fn test_basic_auth_sent_on_every_page() {
    let server = MockServer::start().await;

    // "alice:secret" base64-encoded
    let authorization = "Basic YWxpY2U6c2VjcmV0";
    for (route, links) in [("/", vec!["/private"]), ("/private", vec![])] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("authorization", authorization))
            .respond_with(ResponseTemplate::new(200).set_body_raw(html_page(LONG_TEXT, &links), "text/html"))
            .mount(&server)
            .await;
    }

    let auth = AuthConfig::from_credentials(Some("alice"), Some("secret"));
    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), auth)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.stats.failed_pages, 0);
}

#[tokio::test]
async fn test_session_login_cookie_carried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("user=alice"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "session=abc; Path=/"))
        .expect(1)
        .mount(&server)
        .await;
    for (route, links) in [("/", vec!["/members"]), ("/members", vec![])] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("cookie", "session=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(html_page(LONG_TEXT, &links), "text/html"))
            .mount(&server)
            .await;
    }

    let mut payload = BTreeMap::new();
    payload.insert("user".to_string(), "alice".to_string());
    payload.insert("pass".to_string(), "secret".to_string());
    let auth = AuthConfig::SessionLogin {
        login_url: format!("{}/login", server.uri()),
        login_payload: payload,
    };

    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), auth)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.stats.failed_pages, 0);
}

#[tokio::test]
async fn test_failed_login_still_crawls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mount_page(&server, "/", html_page(LONG_TEXT, &[])).await;

    let auth = AuthConfig::SessionLogin {
        login_url: format!("{}/login", server.uri()),
        login_payload: BTreeMap::new(),
    };
    let crawler = Crawler::new(&create_test_config(&server.uri(), 10), auth)
        .expect("Failed to create crawler");
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(report.documents.len(), 1);
}

#[tokio::test]
async fn test_streaming_matches_collected_crawl() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page(LONG_TEXT, &["/1", "/2"])).await;
    mount_page(&server, "/1", html_page("Tiny.", &[])).await;
    mount_page(&server, "/2", html_page(LONG_TEXT, &[])).await;

    let config = create_test_config(&server.uri(), 10);

    let mut streamed = Vec::new();
    let stats = Crawler::new(&config, AuthConfig::None)
        .expect("Failed to create crawler")
        .crawl_streaming(|doc| streamed.push(doc.source().to_string()))
        .await
        .expect("Crawl failed");

    let report = Crawler::new(&config, AuthConfig::None)
        .expect("Failed to create crawler")
        .crawl()
        .await
        .expect("Crawl failed");
    let collected: Vec<String> = report
        .documents
        .iter()
        .map(|d| d.source().to_string())
        .collect();

    assert_eq!(streamed, collected);
    assert_eq!(stats.documents, 2);
    assert_eq!(stats.thin_pages, 1);
    assert_eq!(
        stats.pages_visited,
        stats.documents + stats.thin_pages + stats.failed_pages
    );
}
