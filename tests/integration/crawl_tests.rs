//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full harvest cycle end-to-end.

use kb_harvest::classifier::LinkClassifier;
use kb_harvest::config::{Config, UserAgentConfig};
use kb_harvest::crawler::{run_crawl, CrawlDriver, DriverSettings, HttpFetcher};
use kb_harvest::extract::{
    ContentExtractor, ExtractedContent, ExtractionError, PdfTextExtractor,
};
use kb_harvest::output::{
    write_json_file, Attribution, ContentType, FailureKind, OutputRecord, RecordAssembler,
};
use kb_harvest::{CanonicalUrl, RunState};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.politeness_interval = 0;
    config.crawler.request_timeout = 5;
    config.user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    config.attribution.team_id = "aline123".to_string();
    config.attribution.user_id = "aline".to_string();
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

fn article_page(title: &str) -> String {
    format!(
        r#"<html><head><title>{title} | Blog</title></head><body>
        <nav><a href="/">Home</a><a href="/about">About</a></nav>
        <article><h1>{title}</h1><p>All about {title}.</p></article>
        <footer><a href="/privacy">Privacy</a></footer>
        </body></html>"#
    )
}

fn index_page(links: &[&str]) -> String {
    let items: String = links
        .iter()
        .map(|l| format!(r#"<li><a href="{l}">{l}</a></li>"#))
        .collect();
    format!(
        r#"<html><head><title>Blog</title></head><body>
        <nav><a href="/">Home</a><a href="/about">About</a><a href="/tag/rust">Rust</a></nav>
        <ul>{items}</ul>
        <a href="https://twitter.com/share">Share</a>
        <a href="mailto:hi@example.com">Mail</a>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn seeds(server: &MockServer, routes: &[&str]) -> Vec<String> {
    routes
        .iter()
        .map(|r| format!("{}{}", server.uri(), r))
        .collect()
}

#[tokio::test]
async fn test_index_seed_end_to_end() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/blog",
        index_page(&["/blog/two-pointers", "/blog/binary-search", "/blog/heaps"]),
    )
    .await;
    mount_page(&server, "/blog/two-pointers", article_page("Two Pointers")).await;
    mount_page(&server, "/blog/binary-search", article_page("Binary Search")).await;
    mount_page(&server, "/blog/heaps", article_page("Heaps")).await;

    let report = run_crawl(
        &create_test_config(),
        &seeds(&server, &["/blog/"]),
        &[],
        false,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.state, RunState::Drained);
    assert!(report.diagnostics.is_empty());

    let expected: Vec<String> = ["/blog/two-pointers", "/blog/binary-search", "/blog/heaps"]
        .iter()
        .map(|r| format!("{}{}", server.uri(), r))
        .collect();
    let sources: Vec<_> = report.records.iter().map(|r| r.source_url.clone()).collect();
    assert_eq!(sources, expected);

    let first = &report.records[0];
    assert_eq!(first.title, "Two Pointers");
    assert!(first.content.contains("All about Two Pointers."));
    assert!(!first.content.contains("Privacy"));
    assert_eq!(first.content_type, ContentType::Other);
    assert_eq!(first.team_id, "aline123");
    assert_eq!(first.user_id, "aline");
    assert_eq!(first.author, None);

    // Navigation, taxonomy and off-site links were never requested
    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(requested.len(), 4);
    assert!(!requested.contains(&"/about".to_string()));
    assert!(!requested.contains(&"/tag/rust".to_string()));
}

#[tokio::test]
async fn test_dead_link_becomes_diagnostic() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/blog",
        index_page(&["/blog/one", "/blog/missing", "/blog/two"]),
    )
    .await;
    mount_page(&server, "/blog/one", article_page("One")).await;
    mount_page(&server, "/blog/two", article_page("Two")).await;
    Mock::given(method("GET"))
        .and(path("/blog/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let report = run_crawl(
        &create_test_config(),
        &seeds(&server, &["/blog"]),
        &[],
        false,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.kind, FailureKind::FetchFailure);
    assert_eq!(diagnostic.url, format!("{}/blog/missing", server.uri()));
    assert_eq!(diagnostic.reason, "HTTP 404");
}

#[tokio::test]
async fn test_depth_limit_is_respected() {
    let server = MockServer::start().await;
    mount_page(&server, "/blog", index_page(&["/blog/series"])).await;
    mount_page(&server, "/blog/series", index_page(&["/blog/series/part-1"])).await;
    Mock::given(method("GET"))
        .and(path("/blog/series/part-1"))
        .respond_with(html(article_page("Part 1")))
        .expect(0)
        .mount(&server)
        .await;

    let report = run_crawl(
        &create_test_config(),
        &seeds(&server, &["/blog"]),
        &[],
        false,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    // The depth-1 page is harvested as content, not expanded
    assert_eq!(report.records.len(), 1);
    assert_eq!(
        report.records[0].source_url,
        format!("{}/blog/series", server.uri())
    );
}

#[tokio::test]
async fn test_item_budget() {
    let server = MockServer::start().await;
    let routes = ["/blog/1", "/blog/2", "/blog/3", "/blog/4", "/blog/5"];
    mount_page(&server, "/blog", index_page(&routes)).await;
    for (i, route) in routes.iter().enumerate() {
        mount_page(&server, route, article_page(&format!("Post {}", i + 1))).await;
    }

    let mut config = create_test_config();
    config.crawler.item_budget = Some(2);

    let report = run_crawl(
        &config,
        &seeds(&server, &["/blog"]),
        &[],
        false,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.state, RunState::Drained);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_cancelled_run_fetches_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(article_page("Never")))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = run_crawl(
        &create_test_config(),
        &seeds(&server, &["/blog"]),
        &[],
        false,
        &cancel,
    )
    .await
    .unwrap();

    assert_eq!(report.state, RunState::Aborted);
    assert!(report.records.is_empty());
}

#[tokio::test]
async fn test_politeness_interval_spaces_fetches() {
    let server = MockServer::start().await;
    mount_page(&server, "/blog", index_page(&["/blog/a", "/blog/b"])).await;
    mount_page(&server, "/blog/a", article_page("A")).await;
    mount_page(&server, "/blog/b", article_page("B")).await;

    let mut config = create_test_config();
    config.crawler.politeness_interval = 150;

    let started = std::time::Instant::now();
    let report = run_crawl(
        &config,
        &seeds(&server, &["/blog"]),
        &[],
        false,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.records.len(), 2);
    // Two waits between three fetches
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_parallel_mode_merges_seeds() {
    let server = MockServer::start().await;
    mount_page(&server, "/blog", index_page(&["/blog/a", "/blog/b"])).await;
    mount_page(&server, "/blog/a", article_page("A")).await;
    mount_page(&server, "/blog/b", article_page("B")).await;
    mount_page(&server, "/notes/c", article_page("C")).await;

    let report = run_crawl(
        &create_test_config(),
        &seeds(&server, &["/blog", "/notes/c"]),
        &[],
        true,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let mut titles: Vec<_> = report.records.iter().map(|r| r.title.clone()).collect();
    titles.sort();
    assert_eq!(titles, vec!["A", "B", "C"]);
    assert_eq!(report.stats.records, 3);
    assert_eq!(report.state, RunState::Drained);
}

/// Extractor that keeps the raw HTML length, to prove extraction is pluggable
struct LengthExtractor;

impl ContentExtractor for LengthExtractor {
    fn extract(
        &self,
        url: &CanonicalUrl,
        html: &str,
    ) -> Result<ExtractedContent, ExtractionError> {
        Ok(ExtractedContent {
            title: url.last_segment().unwrap_or_default().to_uppercase(),
            body: format!("{} bytes", html.len()),
            author: Some("Extractor".to_string()),
        })
    }
}

#[tokio::test]
async fn test_custom_extractor_is_used() {
    let server = MockServer::start().await;
    mount_page(&server, "/blog", index_page(&["/blog/post"])).await;
    mount_page(&server, "/blog/post", article_page("Post")).await;

    let config = create_test_config();
    let fetcher = HttpFetcher::from_config(&config.user_agent, Duration::from_secs(5)).unwrap();
    let driver = CrawlDriver::new(
        DriverSettings {
            max_depth: 1,
            politeness_interval: Duration::ZERO,
            item_budget: None,
        },
        Arc::new(fetcher),
        Arc::new(LengthExtractor),
        Arc::new(PdfTextExtractor::new()),
        LinkClassifier::default(),
        RecordAssembler::new(Attribution::new("t", "u"), ContentType::PodcastTranscript),
    );

    let report = driver
        .run(&seeds(&server, &["/blog"]), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.title, "POST");
    assert!(record.content.ends_with(" bytes"));
    assert_eq!(record.author.as_deref(), Some("Extractor"));
    assert_eq!(record.content_type, ContentType::PodcastTranscript);
}

#[tokio::test]
async fn test_records_written_as_json() {
    let server = MockServer::start().await;
    mount_page(&server, "/blog/post", article_page("Post")).await;

    let report = run_crawl(
        &create_test_config(),
        &[format!("{}/blog/post", server.uri()), "not a url".to_string()],
        &[],
        false,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let records_path = dir.path().join("records.json");
    let diagnostics_path = dir.path().join("diagnostics.json");
    write_json_file(&report.records, &records_path).unwrap();
    write_json_file(&report.diagnostics, &diagnostics_path).unwrap();

    let records: Vec<OutputRecord> =
        serde_json::from_str(&std::fs::read_to_string(&records_path).unwrap()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_url, format!("{}/blog/post", server.uri()));

    let diagnostics: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&diagnostics_path).unwrap()).unwrap();
    assert_eq!(diagnostics[0]["url"], "not a url");
    assert_eq!(diagnostics[0]["kind"], "invalid_url");
}
