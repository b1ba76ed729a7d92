//! Archive runs against a mock listing platform

use crate::common::{file_names, test_config};
use quire::config::ListingConfig;
use quire::crawler::{build_http_client, fetch_post_list, Coordinator};
use quire::{PlatformKind, PlatformProfile, PostId, PostOutcome};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_listing_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("currentPage", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn listing_config(page_size: u32) -> ListingConfig {
    ListingConfig {
        page_size,
        max_pages: 10,
    }
}

#[tokio::test]
async fn test_listing_accumulates_until_short_page() {
    let server = MockServer::start().await;
    mount_listing_page(
        &server,
        "1",
        r#"{"postList":[{"logNo":"301","title":"First+post","addDate":"2021. 7. 19."},{"logNo":"302","title":"It\'s+second","addDate":"2021. 7. 18."}]}"#,
    )
    .await;
    mount_listing_page(
        &server,
        "2",
        r#"{"postList":[{"logNo":"303","title":"Third","addDate":"2021. 7. 17."}]}"#,
    )
    .await;

    let client = build_http_client().unwrap();
    let profile = PlatformProfile::naver("kicho_57", Some(server.uri()));
    let posts = fetch_post_list(&client, &profile, "kicho_57", &listing_config(2))
        .await
        .unwrap();

    let ids: Vec<_> = posts.iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, vec!["301", "302", "303"]);
    assert_eq!(posts[0].title, "First post");
    assert_eq!(posts[1].title, "It's second");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_listing_failure_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount_listing_page(
        &server,
        "1",
        r#"{"postList":[{"logNo":"1","title":"A","addDate":""},{"logNo":"2","title":"B","addDate":""}]}"#,
    )
    .await;
    mount_listing_page(&server, "2", "{ this is not json").await;

    let client = build_http_client().unwrap();
    let profile = PlatformProfile::naver("kicho_57", Some(server.uri()));
    let posts = fetch_post_list(&client, &profile, "kicho_57", &listing_config(2))
        .await
        .unwrap();

    assert_eq!(posts.len(), 2);
}

#[tokio::test]
async fn test_listing_stops_on_missing_post_list() {
    let server = MockServer::start().await;
    mount_listing_page(&server, "1", r#"{"resultCode":"E","resultMessage":"none"}"#).await;

    let client = build_http_client().unwrap();
    let profile = PlatformProfile::naver("kicho_57", Some(server.uri()));
    let posts = fetch_post_list(&client, &profile, "kicho_57", &listing_config(30))
        .await
        .unwrap();

    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_listing_run_uses_hints_and_limit() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_listing_page(
        &server,
        "1",
        r#"{"postList":[{"logNo":"401","title":"Listed+title","addDate":"2020. 3. 2."},{"logNo":"402","title":"Other","addDate":"2020. 3. 1."},{"logNo":"403","title":"Dropped","addDate":"2020. 2. 1."}]}"#,
    )
    .await;

    // 401 has no title element; the listing title stands in
    Mock::given(method("GET"))
        .and(path("/PostView.naver"))
        .and(query_param("logNo", "401"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div class="se-main-container"><p>Body of 401</p></div></body></html>"#,
        ))
        .mount(&server)
        .await;

    // 402 has a title but no body container, so it is skipped
    Mock::given(method("GET"))
        .and(path("/PostView.naver"))
        .and(query_param("logNo", "402"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div class="se-title-text">Real title</div></body></html>"#,
        ))
        .mount(&server)
        .await;

    let mut config = test_config(PlatformKind::Naver, &server.uri(), &output);
    config.platform.blog_id = "kicho_57".to_string();

    let report = Coordinator::new(config)
        .unwrap()
        .archive_listing("kicho_57", 2)
        .await
        .unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.archived(), 1);
    assert!(matches!(
        report.outcome_for(&PostId::from(402)),
        Some(PostOutcome::Skipped { .. })
    ));
    assert_eq!(report.outcome_for(&PostId::from(403)), None);

    assert_eq!(file_names(&output.path().join("posts")), vec!["401.md"]);
    let record = fs::read_to_string(output.path().join("posts/401.md")).unwrap();
    assert!(record.contains("title: \"Listed title\""));
    assert!(record.contains("date: \"2020. 3. 2.\""));
    assert!(record.contains("Body of 401"));
}

#[tokio::test]
async fn test_listing_unsupported_on_single_post_platform() {
    let output = TempDir::new().unwrap();
    let config = test_config(PlatformKind::Tistory, "http://127.0.0.1:9", &output);

    let result = Coordinator::new(config)
        .unwrap()
        .archive_listing("kicho", 0)
        .await;
    assert!(result.is_err());
}
