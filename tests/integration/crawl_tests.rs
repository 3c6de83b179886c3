//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, render and save cycle end-to-end.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use url::Url;
use web_scraper::config::{Config, CrawlerConfig, OutputConfig, OutputFormat};
use web_scraper::crawler::{scrape_single_page, CrawlSession};
use web_scraper::output::{asset_file_name, RunStats};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a fast test configuration
fn create_test_config(max_depth: u32, max_pages: usize, format: OutputFormat) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            max_pages,
            rate_limit: 0.0,
            timeout: 5,
            asset_timeout: 5,
            ..CrawlerConfig::default()
        },
        output: OutputConfig { format },
    }
}

fn seed_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("mock server URL parses")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn run_crawl(config: Config, seed: Url, output_dir: &Path) -> RunStats {
    let mut session = CrawlSession::new(config, seed, output_dir).expect("session builds");
    session.run().await
}

/// Paths of page requests in arrival order, robots.txt excluded
async fn page_request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|request| request.url.path().to_string())
        .filter(|p| p != "/robots.txt")
        .collect()
}

#[tokio::test]
async fn test_depth_zero_saves_only_seed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body>
           <a href="/a">A</a><a href="/b">B</a></body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stats = run_crawl(
        create_test_config(0, 50, OutputFormat::Html),
        seed_url(&server),
        dir.path(),
    )
    .await;

    assert_eq!(
        stats,
        RunStats {
            succeeded: 1,
            failed: 0,
            skipped: 0
        }
    );
    assert!(dir.path().join("index.html").exists());
    assert!(!dir.path().join("a.html").exists());
}

#[tokio::test]
async fn test_breadth_first_order_and_same_domain() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="http://other.invalid/x">Ext</a>"#
            .to_string(),
    )
    .await;
    mount_page(&server, "/a", r#"<a href="/c">C</a>"#.to_string()).await;
    mount_page(&server, "/b", "<p>b</p>".to_string()).await;
    mount_page(&server, "/c", "<p>c</p>".to_string()).await;

    let dir = TempDir::new().unwrap();
    let stats = run_crawl(
        create_test_config(2, 50, OutputFormat::Html),
        seed_url(&server),
        dir.path(),
    )
    .await;

    assert_eq!(stats.succeeded, 4);
    assert_eq!(stats.failed, 0);
    assert_eq!(page_request_paths(&server).await, vec!["/", "/a", "/b", "/c"]);
    for name in ["index.html", "a.html", "b.html", "c.html"] {
        assert!(dir.path().join(name).exists(), "missing {}", name);
    }
}

#[tokio::test]
async fn test_robots_disallowed_page_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/\n"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        r#"<a href="/private/secret">S</a><a href="/public">P</a>"#.to_string(),
    )
    .await;
    mount_page(&server, "/public", "<p>open</p>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stats = run_crawl(
        create_test_config(1, 50, OutputFormat::Html),
        seed_url(&server),
        dir.path(),
    )
    .await;

    assert_eq!(
        stats,
        RunStats {
            succeeded: 2,
            failed: 0,
            skipped: 1
        }
    );
    assert!(!dir.path().join("private").join("secret.html").exists());
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/", "<p>home</p>".to_string()).await;

    let mut config = create_test_config(0, 50, OutputFormat::Html);
    config.crawler.respect_robots = false;

    let dir = TempDir::new().unwrap();
    let stats = run_crawl(config, seed_url(&server), dir.path()).await;
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.skipped, 0);
}

#[tokio::test]
async fn test_http_error_counts_as_failed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/missing">M</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stats = run_crawl(
        create_test_config(1, 50, OutputFormat::Html),
        seed_url(&server),
        dir.path(),
    )
    .await;

    assert_eq!(
        stats,
        RunStats {
            succeeded: 1,
            failed: 1,
            skipped: 0
        }
    );
    assert!(!dir.path().join("missing.html").exists());
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r##"<a href="/dup">1</a><a href="/dup/">2</a><a href="/dup#x">3</a><a href="/">self</a>"##
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/dup"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/">home</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stats = run_crawl(
        create_test_config(2, 50, OutputFormat::Html),
        seed_url(&server),
        dir.path(),
    )
    .await;

    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.total(), 2);
}

#[tokio::test]
async fn test_page_budget_is_respected() {
    let server = MockServer::start().await;
    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", links).await;
    for i in 1..=5 {
        mount_page(&server, &format!("/p{}", i), format!("<p>{}</p>", i)).await;
    }

    let dir = TempDir::new().unwrap();
    let stats = run_crawl(
        create_test_config(2, 3, OutputFormat::Html),
        seed_url(&server),
        dir.path(),
    )
    .await;

    assert_eq!(stats.total(), 3);
    assert_eq!(page_request_paths(&server).await, vec!["/", "/p1", "/p2"]);
}

#[tokio::test]
async fn test_markdown_with_localized_image() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><head><title>Doc</title></head><body>
           <h2>Title</h2><p>Body</p><img src="a.png" alt="A"></body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let seed = seed_url(&server);
    let stats = run_crawl(
        create_test_config(0, 50, OutputFormat::Markdown),
        seed.clone(),
        dir.path(),
    )
    .await;
    assert_eq!(stats.succeeded, 1);

    let image_name = asset_file_name(&seed.join("a.png").unwrap());
    assert!(dir.path().join("images").join(&image_name).exists());

    let saved = std::fs::read_to_string(dir.path().join("index.md")).unwrap();
    assert!(saved.starts_with("# Doc\n\nSource: "));
    assert!(saved.ends_with(&format!(
        "\n## Title\n\nBody\n\n![A](images/{})\n",
        image_name
    )));
}

#[tokio::test]
async fn test_failed_image_does_not_fail_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<h2>Title</h2><p>Body</p><img src="/a.png" alt="A">"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let seed = seed_url(&server);
    let stats = run_crawl(
        create_test_config(0, 50, OutputFormat::Markdown),
        seed.clone(),
        dir.path(),
    )
    .await;

    assert_eq!(
        stats,
        RunStats {
            succeeded: 1,
            failed: 0,
            skipped: 0
        }
    );
    let saved = std::fs::read_to_string(dir.path().join("index.md")).unwrap();
    assert!(saved.contains("\n## Title\n"));
    assert!(saved.contains("\nBody\n"));
    assert!(saved.contains(&format!("![A]({})", seed.join("/a.png").unwrap())));
}

#[tokio::test]
async fn test_nested_pages_reference_shared_images() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/blog/post">post</a>"#.to_string()).await;
    mount_page(
        &server,
        "/blog/post",
        r#"<html><head></head><body><img src="/logo.gif"></body></html>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/logo.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"GIF89a".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let seed = seed_url(&server);
    let stats = run_crawl(
        create_test_config(1, 50, OutputFormat::Html),
        seed.clone(),
        dir.path(),
    )
    .await;
    assert_eq!(stats.succeeded, 2);

    let image_name = asset_file_name(&seed.join("/logo.gif").unwrap());
    let saved = std::fs::read_to_string(dir.path().join("blog").join("post.html")).unwrap();
    assert!(saved.contains(&format!(r#"src="../images/{}""#, image_name)));
    assert!(saved.contains(r#"<meta name="scraper-source""#));
}

/// Serves a small site and records when each request arrived
#[derive(Clone, Default)]
struct ArrivalLog(Arc<Mutex<Vec<(String, Instant)>>>);

impl Respond for ArrivalLog {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let route = request.url.path().to_string();
        self.0.lock().unwrap().push((route.clone(), Instant::now()));

        let body = match route.as_str() {
            "/robots.txt" => "User-agent: *\nAllow: /\n",
            "/" => r#"<a href="/next">n</a>"#,
            _ => "<p>n</p>",
        };
        ResponseTemplate::new(200).set_body_string(body)
    }
}

#[tokio::test]
async fn test_rate_limit_spaces_every_request_to_origin() {
    let server = MockServer::start().await;
    let arrivals = ArrivalLog::default();
    Mock::given(method("GET"))
        .respond_with(arrivals.clone())
        .mount(&server)
        .await;

    let mut config = create_test_config(1, 50, OutputFormat::Html);
    config.crawler.rate_limit = 0.3;
    config.crawler.respect_robots = true;

    let dir = TempDir::new().unwrap();
    let stats = run_crawl(config, seed_url(&server), dir.path()).await;
    assert_eq!(stats.succeeded, 2);

    let arrivals = arrivals.0.lock().unwrap().clone();
    let routes: Vec<&str> = arrivals.iter().map(|(route, _)| route.as_str()).collect();
    assert_eq!(routes, vec!["/robots.txt", "/", "/next"]);

    for pair in arrivals.windows(2) {
        let gap = pair[1].1.duration_since(pair[0].1);
        assert!(
            gap >= Duration::from_millis(280),
            "{} -> {} only {:?} apart",
            pair[0].0,
            pair[1].0,
            gap
        );
    }
}

#[tokio::test]
async fn test_non_utf8_page_decoded_by_charset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<title>caf\xe9</title><p>caf\xe9 cr\xe8me</p>".to_vec(),
            "text/html; charset=iso-8859-1",
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stats = run_crawl(
        create_test_config(0, 50, OutputFormat::Markdown),
        seed_url(&server),
        dir.path(),
    )
    .await;
    assert_eq!(stats.succeeded, 1);

    let saved = std::fs::read_to_string(dir.path().join("index.md")).unwrap();
    assert!(saved.starts_with("# café\n"));
    assert!(saved.contains("\ncafé crème\n"));
    assert!(!saved.contains('\u{fffd}'));
}

#[tokio::test]
async fn test_single_page_saves_markup() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/article",
        r#"<html><head><title>A</title></head><body><img src="pic.png"><a href="/other">o</a></body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/pic.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("page.html");
    let url = Url::parse(&format!("{}/article", server.uri())).unwrap();

    let saved = scrape_single_page(&create_test_config(0, 1, OutputFormat::Html), &url, &output)
        .await
        .unwrap();
    assert_eq!(saved, output);

    let image_name = asset_file_name(&url.join("pic.png").unwrap());
    assert!(dir.path().join("images").join(&image_name).exists());

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains(&format!(r#"src="images/{}""#, image_name)));
    assert!(html.contains(&format!(
        r#"<meta name="scraper-source" content="{}">"#,
        url
    )));
}

#[tokio::test]
async fn test_single_page_fetch_failure_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("broken.md");
    let url = Url::parse(&format!("{}/broken", server.uri())).unwrap();

    let result =
        scrape_single_page(&create_test_config(0, 1, OutputFormat::Markdown), &url, &output).await;
    assert!(result.is_err());
    assert!(!output.exists());
}
