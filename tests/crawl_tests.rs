//! Integration tests for the listing crawl
//!
//! These tests use wiremock to serve listing and job pages and run the
//! whole traversal over real HTTP, with a recording sleeper so no time passes.

use employer_harvest::config::{FetcherConfig, SiteConfig};
use employer_harvest::crawler::{
    Coordinator, CrawlSettings, Fetcher, HttpTransport, PolitenessDelay, RecordingSleeper,
    RetryPolicy, StopReason,
};
use employer_harvest::extract::SiteRules;
use employer_harvest::output::{export_employers, CRAWL_COLUMNS};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Site rules pinned to the mock server's authority
fn site_rules(server: &MockServer) -> SiteRules {
    let base = Url::parse(&server.uri()).expect("Failed to parse base URL");
    let authority = format!(
        "{}:{}",
        base.host_str().expect("Failed to extract host"),
        base.port().expect("Mock server has no port")
    );

    SiteRules::compile(&SiteConfig {
        host: authority,
        profile_url_template: format!("{}/cjlist{{id}}/", server.uri()),
        ..Default::default()
    })
    .expect("Site rules should compile")
}

fn coordinator(
    server: &MockServer,
    max_listing_pages: usize,
    max_job_pages: usize,
) -> Coordinator<HttpTransport, RecordingSleeper> {
    let fetcher_config = FetcherConfig::default();
    let transport = HttpTransport::from_config(&fetcher_config).expect("Client should build");
    let fetcher = Fetcher::new(
        transport,
        RecordingSleeper::new(),
        RetryPolicy::new(3, Duration::from_millis(10)),
    );

    let settings = CrawlSettings {
        seed_url: Url::parse(&format!("{}/kanto/jlist/", server.uri())).unwrap(),
        max_listing_pages,
        max_job_pages,
        delay: PolitenessDelay::from_millis(0, 0),
    };

    Coordinator::new(fetcher, site_rules(server), settings)
}

async fn serve(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_collects_listing_and_job_employers() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/kanto/jlist/",
        format!(
            r#"<html><body>
            <a href="/cjlist1/">株式会社イチ</a>
            <a href="{base}/cjlist2/">株式会社ニ</a>
            <ul class="ul01">
                <li class="li01"><h3><a href="/kanto/job100/">ホールスタッフ</a></h3></li>
                <li class="li01"><h3><a href="https://elsewhere.example/job200/">外部</a></h3></li>
            </ul>
            </body></html>"#
        ),
    )
    .await;

    serve(
        &server,
        "/kanto/job100/",
        r#"<html><body>
            <a href="/cjlist3/#company">この会社の情報をもっと見る</a>
            </body></html>"#
            .to_string(),
    )
    .await;

    let report = coordinator(&server, 3, 50).run().await;

    assert_eq!(report.stop_reason, StopReason::NoNextPage);
    assert_eq!(report.listing_pages, 1);
    assert_eq!(report.job_pages, 1);
    assert_eq!(report.registry.len(), 3);

    let listing_url = format!("{}/kanto/jlist/", base);
    let first = report.registry.get("1").unwrap();
    assert_eq!(first.profile_url, format!("{}/cjlist1/", base));
    assert_eq!(first.source_listing_url.as_deref(), Some(listing_url.as_str()));
    assert_eq!(first.source_job_url, None);

    let third = report.registry.get("3").unwrap();
    assert_eq!(third.profile_url, format!("{}/cjlist3/", base));
    assert_eq!(
        third.source_job_url.as_deref(),
        Some(format!("{}/kanto/job100/", base).as_str())
    );

    // Export the registry and read it back
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("company_urls.csv");
    let written = export_employers(&out, report.registry.records(), "2024-05-01T09:30:00").unwrap();
    assert_eq!(written, 3);

    let bytes = std::fs::read(&out).unwrap();
    assert!(!bytes.starts_with(b"\xEF\xBB\xBF"));

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, CRAWL_COLUMNS.to_vec());

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    let ids: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert!(rows.iter().all(|r| &r[3] == "2024-05-01T09:30:00"));
    assert_eq!(&rows[0][1], "");
}

#[tokio::test]
async fn test_crawl_follows_next_pages_until_limit() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/kanto/jlist/",
        r#"<html><body>
            <a href="/cjlist10/">十</a>
            <a href="/kanto/jlist/page2/">次へ</a>
            </body></html>"#
            .to_string(),
    )
    .await;
    serve(
        &server,
        "/kanto/jlist/page2/",
        r#"<html><body>
            <a href="/cjlist11/">十一</a>
            <a rel="next" href="/kanto/jlist/page3/">3</a>
            </body></html>"#
            .to_string(),
    )
    .await;

    // Page three must never be requested
    Mock::given(method("GET"))
        .and(path("/kanto/jlist/page3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let report = coordinator(&server, 2, 50).run().await;

    assert_eq!(report.stop_reason, StopReason::ListingLimit);
    assert_eq!(report.listing_pages, 2);
    assert_eq!(report.registry.len(), 2);
    assert!(report.registry.contains("10"));
    assert!(report.registry.contains("11"));
}

#[tokio::test]
async fn test_listing_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/kanto/jlist/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let report = coordinator(&server, 3, 50).run().await;

    assert_eq!(report.listing_pages, 1);
    assert!(report.registry.is_empty());
    assert!(matches!(report.stop_reason, StopReason::ListingUnavailable(_)));
}

#[tokio::test]
async fn test_failed_job_page_is_skipped() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/kanto/jlist/",
        r#"<html><body>
            <ul class="ul01">
                <li class="li01"><a href="/kanto/job1/">a</a></li>
                <li class="li01"><a href="/kanto/job2/">b</a></li>
            </ul>
            </body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/kanto/job1/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    serve(
        &server,
        "/kanto/job2/",
        r#"<a href="/cjlist7/">この会社の情報をもっと見る</a>"#.to_string(),
    )
    .await;

    let report = coordinator(&server, 1, 50).run().await;

    assert_eq!(report.job_pages, 2);
    assert_eq!(report.registry.len(), 1);
    assert!(report.registry.contains("7"));
}
