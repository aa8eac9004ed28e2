//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end. Every mock server listens on its own
//! port, so each one is a distinct origin.

use crawlbot::config::{Config, UserAgentConfig};
use crawlbot::crawler::{
    build_http_client, CrawlRequest, CrawlResult, CrawlScheduler, Fetcher, ROBOTS_DENIED_SNIPPET,
};
use crawlbot::{CrawlError, RobotsCache};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_response(title: &str, links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();

    let body = format!(
        "<html><head><title>{}</title></head><body><main><p>{} body</p>{}</main></body></html>",
        title, title, anchors
    );

    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Mounts an HTML page at `page_path` linking to `links`
async fn mount_page(server: &MockServer, page_path: &str, title: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_response(title, links))
        .mount(server)
        .await;
}

fn scheduler() -> CrawlScheduler {
    CrawlScheduler::new(&Config::default()).expect("Failed to build scheduler")
}

/// A request with no politeness delay so tests run quickly
fn request(seeds: &[String]) -> CrawlRequest {
    CrawlRequest::new(seeds.to_vec())
        .with_request_delay_seconds(0.0)
        .with_timeout_seconds(30)
}

fn paths(results: &[CrawlResult]) -> Vec<String> {
    results
        .iter()
        .map(|r| url::Url::parse(&r.url).unwrap().path().to_string())
        .collect()
}

#[tokio::test]
async fn test_page_fixture_is_served_as_html() {
    let site = MockServer::start().await;
    mount_page(&site, "/", "Home", &["/next"]).await;

    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    let fetcher = Fetcher::new(
        client.clone(),
        Arc::new(RobotsCache::new(client)),
        UserAgentConfig::default().user_agent_string(),
    );
    let page = url::Url::parse(&format!("{}/", site.uri())).unwrap();
    let fetched = fetcher.fetch(&page, Duration::from_secs(5), false).await.unwrap();

    assert_eq!(fetched.content_type, "text/html");
    assert!(fetched.is_parseable());
    assert!(fetched.body.contains(r#"<a href="/next">"#));
}

#[tokio::test]
async fn test_same_origin_crawl_excludes_external_links() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let external_url = format!("{}/", external.uri());

    mount_page(&site, "/", "Home", &["/b", "/c", external_url.as_str()]).await;
    mount_page(&site, "/b", "B", &[]).await;
    mount_page(&site, "/c", "C", &[]).await;
    Mock::given(method("GET"))
        .respond_with(html_response("External", &[]))
        .expect(0)
        .mount(&external)
        .await;

    let results = scheduler()
        .run(&request(&[site.uri()]).with_max_pages(5).with_max_depth(1))
        .await
        .unwrap();

    assert_eq!(paths(&results), vec!["/", "/b", "/c"]);
    assert!(results.iter().all(|r| r.depth <= 1));

    let home = &results[0];
    assert_eq!(home.depth, 0);
    assert_eq!(home.status_code, 200);
    assert_eq!(home.title, "Home");
    assert_eq!(home.snippet, "Home body link link link");
    assert_eq!(home.links_found, 3);
}

#[tokio::test]
async fn test_allowed_origins_permit_crossing() {
    let site = MockServer::start().await;
    let partner = MockServer::start().await;
    let stranger = MockServer::start().await;
    let partner_url = format!("{}/", partner.uri());
    let stranger_url = format!("{}/", stranger.uri());

    mount_page(&site, "/", "Home", &[partner_url.as_str(), stranger_url.as_str()]).await;
    mount_page(&partner, "/", "Partner", &[]).await;
    Mock::given(method("GET"))
        .respond_with(html_response("Stranger", &[]))
        .expect(0)
        .mount(&stranger)
        .await;

    let req = request(&[site.uri()])
        .with_same_origin_only(false)
        .with_allowed_origins([site.uri(), partner.uri()]);
    let results = scheduler().run(&req).await.unwrap();

    let urls: Vec<_> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls.len(), 2);
    assert!(urls.contains(&partner_url.as_str()));
    assert!(!urls.contains(&stranger_url.as_str()));
}

#[tokio::test]
async fn test_cross_origin_without_allow_list_follows_everything() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    let other_url = format!("{}/", other.uri());

    mount_page(&site, "/", "Home", &[other_url.as_str()]).await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response("Other", &[]))
        .expect(1)
        .mount(&other)
        .await;

    let results = scheduler()
        .run(&request(&[site.uri()]).with_same_origin_only(false))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].url, other_url);
    assert_eq!(results[1].depth, 1);
}

#[tokio::test]
async fn test_robots_denied_page_is_never_requested() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .expect(1)
        .mount(&site)
        .await;
    mount_page(&site, "/", "Home", &["/private", "/public"]).await;
    mount_page(&site, "/public", "Public", &[]).await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(html_response("Private", &[]))
        .expect(0)
        .mount(&site)
        .await;

    let results = scheduler().run(&request(&[site.uri()])).await.unwrap();

    assert_eq!(paths(&results), vec!["/", "/private", "/public"]);
    let denied = &results[1];
    assert!(denied.is_robots_denied());
    assert_eq!(denied.status_code, 0);
    assert_eq!(denied.snippet, ROBOTS_DENIED_SNIPPET);
    assert!(denied.title.is_empty());
}

#[tokio::test]
async fn test_unreachable_robots_fails_open() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;
    mount_page(&site, "/", "Home", &["/next"]).await;
    mount_page(&site, "/next", "Next", &[]).await;

    let results = scheduler().run(&request(&[site.uri()])).await.unwrap();

    assert_eq!(paths(&results), vec!["/", "/next"]);
    assert!(results.iter().all(|r| r.is_success()));
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let site = MockServer::start().await;

    mount_page(&site, "/", "Root", &["/level1"]).await;
    mount_page(&site, "/level1", "Level 1", &["/level2"]).await;
    mount_page(&site, "/level2", "Level 2", &["/level3"]).await;
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html_response("Level 3", &[]))
        .expect(0)
        .mount(&site)
        .await;

    let results = scheduler()
        .run(&request(&[site.uri()]).with_max_depth(2))
        .await
        .unwrap();

    assert_eq!(paths(&results), vec!["/", "/level1", "/level2"]);
    let depths: Vec<_> = results.iter().map(|r| r.depth).collect();
    assert_eq!(depths, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_page_budget_respected() {
    let site = MockServer::start().await;

    let links: Vec<String> = (0..10).map(|i| format!("/p{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    mount_page(&site, "/", "Hub", &link_refs).await;
    for link in &links {
        mount_page(&site, link, link, &[]).await;
    }

    let results = scheduler()
        .run(&request(&[site.uri()]).with_max_pages(3))
        .await
        .unwrap();

    assert_eq!(paths(&results), vec!["/", "/p0", "/p1"]);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let site = MockServer::start().await;

    mount_page(&site, "/", "Home", &["/a", "/a/", "/a#top", "/b", "/B"]).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_response("A", &["/", "/b", "/a"]))
        .expect(1)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_response("B", &["/a"]))
        .expect(1)
        .mount(&site)
        .await;
    mount_page(&site, "/B", "Upper B", &[]).await;

    let results = scheduler().run(&request(&[site.uri()])).await.unwrap();

    let unique: HashSet<_> = results.iter().map(|r| r.url.clone()).collect();
    assert_eq!(unique.len(), results.len());
    // Paths are case-sensitive, so /B is a distinct page
    assert_eq!(paths(&results), vec!["/", "/a", "/b", "/B"]);
}

#[tokio::test]
async fn test_http_errors_and_non_html_recorded() {
    let site = MockServer::start().await;

    mount_page(&site, "/", "Home", &["/missing", "/doc.pdf", "/empty"]).await;
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&site)
        .await;

    let results = scheduler().run(&request(&[site.uri()])).await.unwrap();

    assert_eq!(paths(&results), vec!["/", "/missing", "/doc.pdf", "/empty"]);

    assert_eq!(results[1].status_code, 404);
    assert_eq!(results[1].snippet, "[HTTP 404]");
    assert_eq!(results[1].links_found, 0);

    assert!(results[0].is_success());

    assert_eq!(results[2].status_code, 200);
    assert_eq!(results[2].snippet, "[HTTP 200]");
    assert!(!results[2].is_success());

    assert_eq!(results[3].snippet, "[HTTP 200]");
    assert!(results[3].title.is_empty());
    assert!(!results[3].is_success());
}

#[tokio::test]
async fn test_slow_page_does_not_stop_the_run() {
    let site = MockServer::start().await;

    mount_page(&site, "/", "Home", &["/slow", "/fast"]).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_response("Slow", &[]).set_delay(Duration::from_secs(5)))
        .mount(&site)
        .await;
    mount_page(&site, "/fast", "Fast", &[]).await;

    // A 6 second budget gives each fetch about 2 seconds
    let results = scheduler()
        .run(&request(&[site.uri()]).with_timeout_seconds(6))
        .await
        .unwrap();

    assert_eq!(paths(&results), vec!["/", "/fast"]);
}

#[tokio::test]
async fn test_no_valid_seeds_is_an_error() {
    let result = scheduler()
        .run(&request(&["mailto:someone@example.com".to_string(), "::".to_string()]))
        .await;

    assert!(matches!(result, Err(CrawlError::NoValidSeeds)));
}

#[tokio::test]
async fn test_invalid_seeds_are_skipped() {
    let site = MockServer::start().await;
    mount_page(&site, "/", "Home", &[]).await;

    let seeds = vec!["not a url".to_string(), site.uri()];
    let results = scheduler().run(&request(&seeds)).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Home");
}

#[tokio::test]
async fn test_breadth_first_order_is_deterministic() {
    let site = MockServer::start().await;

    mount_page(&site, "/", "Root", &["/a", "/b"]).await;
    mount_page(&site, "/a", "A", &["/a1"]).await;
    mount_page(&site, "/b", "B", &["/b1"]).await;
    mount_page(&site, "/a1", "A1", &[]).await;
    mount_page(&site, "/b1", "B1", &[]).await;

    let scheduler = scheduler();
    let first = scheduler.run(&request(&[site.uri()])).await.unwrap();
    let second = scheduler.run(&request(&[site.uri()])).await.unwrap();

    assert_eq!(paths(&first), vec!["/", "/a", "/b", "/a1", "/b1"]);
    assert_eq!(paths(&first), paths(&second));

    let depths: Vec<_> = first.iter().map(|r| r.depth).collect();
    assert!(depths.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_robots_cache_shared_between_schedulers() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .expect(1)
        .mount(&site)
        .await;
    mount_page(&site, "/", "Home", &[]).await;

    let config = Config::default();
    let cache = Arc::new(RobotsCache::new(reqwest::Client::new()));
    let first = CrawlScheduler::with_robots_cache(&config, Arc::clone(&cache)).unwrap();
    let second = CrawlScheduler::with_robots_cache(&config, Arc::clone(&cache)).unwrap();

    assert_eq!(first.run(&request(&[site.uri()])).await.unwrap().len(), 1);
    assert_eq!(second.run(&request(&[site.uri()])).await.unwrap().len(), 1);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_multiple_seeds_share_one_frontier() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    mount_page(&first, "/", "First", &["/x"]).await;
    mount_page(&first, "/x", "First X", &[]).await;
    mount_page(&second, "/", "Second", &[]).await;

    let results = scheduler()
        .run(&request(&[first.uri(), second.uri()]))
        .await
        .unwrap();

    let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "First X"]);
}
