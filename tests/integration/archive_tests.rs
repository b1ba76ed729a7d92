//! Archive runs against a mock single-post platform

use crate::common::{file_names, test_config, tistory_page};
use quire::crawler::Coordinator;
use quire::{PlatformKind, PostId, PostOutcome};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, route: &str, content_type: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(route.as_bytes().to_vec())
                .insert_header("content-type", content_type),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_three_post_run_archives_only_the_real_post() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/2",
        "<html><body><p>This post is protected</p></body></html>".to_string(),
    )
    .await;
    mount_page(&server, "/3", tistory_page("Spring walk", "<p>Hello</p>")).await;

    let config = test_config(PlatformKind::Tistory, &server.uri(), &output);
    let coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.archive_range(1, 3).await;

    assert_eq!(report.total(), 3);
    assert_eq!(report.archived(), 1);
    assert_eq!(report.outcome_for(&PostId::from(1)), Some(&PostOutcome::NotFound));
    assert!(matches!(
        report.outcome_for(&PostId::from(2)),
        Some(PostOutcome::Skipped { .. })
    ));
    assert!(report.outcome_for(&PostId::from(3)).unwrap().is_success());

    assert_eq!(file_names(&output.path().join("posts")), vec!["3.md"]);

    let record = fs::read_to_string(output.path().join("posts/3.md")).unwrap();
    assert!(record.starts_with("---\ntitle: \"Spring walk\"\n"));
    assert!(record.contains("date: \"2021. 7. 19. 23:31\""));
    assert!(record.contains("category: \"Travel\""));
    assert!(record.contains("\nid: 3\n"));
    assert!(record.contains("Hello"));
}

#[tokio::test]
async fn test_distinct_images_are_stored_once_and_rewritten() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let uri = server.uri();

    let body = format!(
        r#"<p>Photos</p>
        <img src="{uri}/img/a.jpg" alt="first">
        <img src="{uri}/blank.gif" data-lazy-src="{uri}/img/noext" alt="lazy">
        <p><img src="{uri}/img/a.jpg" alt="again"></p>
        <img src="data:image/gif;base64,R0lGOD">"#
    );
    mount_page(&server, "/10", tistory_page("Gallery", &body)).await;
    mount_image(&server, "/img/a.jpg", "image/jpeg", 1).await;
    mount_image(&server, "/img/noext", "image/png", 1).await;

    let config = test_config(PlatformKind::Tistory, &uri, &output);
    let report = Coordinator::new(config).unwrap().archive_range(10, 10).await;

    assert_eq!(
        report.outcome_for(&PostId::from(10)),
        Some(&PostOutcome::Archived {
            assets: 2,
            asset_failures: 0
        })
    );

    let images_dir = output.path().join("images/10");
    assert_eq!(
        file_names(&images_dir),
        vec!["a.jpg", "noext.png"]
    );
    assert_eq!(fs::read(images_dir.join("a.jpg")).unwrap(), b"/img/a.jpg");
    assert!(output.path().join(".assets/10.json").is_file());

    let record = fs::read_to_string(output.path().join("posts/10.md")).unwrap();
    assert!(!record.contains(&format!("{}/img/", uri)));
    assert_eq!(record.matches("../images/10/a.jpg").count(), 2);
    assert!(record.contains("../images/10/noext.png"));

    server.verify().await;
}

#[tokio::test]
async fn test_rerun_does_not_refetch_existing_assets() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let uri = server.uri();

    let body = format!(
        r#"<img src="{uri}/img/cover.png"><img src="{uri}/img/raw?type=w2">"#
    );
    mount_page(&server, "/5", tistory_page("Rerun", &body)).await;
    mount_image(&server, "/img/cover.png", "image/png", 1).await;
    mount_image(&server, "/img/raw", "image/webp", 1).await;

    let config = test_config(PlatformKind::Tistory, &uri, &output);
    let first = Coordinator::new(config.clone()).unwrap().archive_range(5, 5).await;
    assert_eq!(first.archived(), 1);
    let first_record = fs::read_to_string(output.path().join("posts/5.md")).unwrap();

    let second = Coordinator::new(config).unwrap().archive_range(5, 5).await;
    assert_eq!(second.archived(), 1);
    let second_record = fs::read_to_string(output.path().join("posts/5.md")).unwrap();

    assert_eq!(first_record, second_record);
    assert_eq!(
        file_names(&output.path().join("images/5")),
        vec!["cover.png", "raw.webp"]
    );

    // Each image was requested exactly once over both runs
    server.verify().await;
}

#[tokio::test]
async fn test_failed_image_keeps_remote_url() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let uri = server.uri();

    let body = format!(r#"<img src="{uri}/img/gone.jpg"><img src="{uri}/img/ok.gif">"#);
    mount_page(&server, "/6", tistory_page("Partial", &body)).await;
    Mock::given(method("GET"))
        .and(path("/img/gone.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_image(&server, "/img/ok.gif", "image/gif", 1).await;

    let config = test_config(PlatformKind::Tistory, &uri, &output);
    let report = Coordinator::new(config).unwrap().archive_range(6, 6).await;

    assert_eq!(
        report.outcome_for(&PostId::from(6)),
        Some(&PostOutcome::Archived {
            assets: 1,
            asset_failures: 1
        })
    );

    let record = fs::read_to_string(output.path().join("posts/6.md")).unwrap();
    assert!(record.contains(&format!("{}/img/gone.jpg", uri)));
    assert!(record.contains("../images/6/ok.gif"));
    assert_eq!(
        file_names(&output.path().join("images/6")),
        vec!["ok.gif"]
    );
}

#[tokio::test]
async fn test_same_filename_from_different_urls_gets_suffix() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let uri = server.uri();

    let body = format!(r#"<img src="{uri}/a/photo.jpg"><img src="{uri}/b/photo.jpg">"#);
    mount_page(&server, "/7", tistory_page("Twins", &body)).await;
    mount_image(&server, "/a/photo.jpg", "image/jpeg", 1).await;
    mount_image(&server, "/b/photo.jpg", "image/jpeg", 1).await;

    let config = test_config(PlatformKind::Tistory, &uri, &output);
    let report = Coordinator::new(config).unwrap().archive_range(7, 7).await;
    assert_eq!(report.archived(), 1);

    let images_dir = output.path().join("images/7");
    assert_eq!(
        file_names(&images_dir),
        vec!["photo.jpg", "photo_1.jpg"]
    );
    assert_eq!(fs::read(images_dir.join("photo.jpg")).unwrap(), b"/a/photo.jpg");
    assert_eq!(fs::read(images_dir.join("photo_1.jpg")).unwrap(), b"/b/photo.jpg");
}

#[tokio::test]
async fn test_asset_requests_carry_referer() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let uri = server.uri();

    let body = format!(r#"<img src="{uri}/img/guarded.jpg">"#);
    mount_page(&server, "/8", tistory_page("Guarded", &body)).await;
    Mock::given(method("GET"))
        .and(path("/img/guarded.jpg"))
        .and(header("referer", format!("{}/", uri).as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"jpeg".to_vec())
                .insert_header("content-type", "image/jpeg"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(PlatformKind::Tistory, &uri, &output);
    let report = Coordinator::new(config).unwrap().archive_range(8, 8).await;

    assert_eq!(
        report.outcome_for(&PostId::from(8)),
        Some(&PostOutcome::Archived {
            assets: 1,
            asset_failures: 0
        })
    );
    server.verify().await;
}

#[tokio::test]
async fn test_transient_failure_is_recorded_not_fatal() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/20"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(&server, "/21", tistory_page("Fine", "<p>ok</p>")).await;

    let config = test_config(PlatformKind::Tistory, &server.uri(), &output);
    let report = Coordinator::new(config).unwrap().archive_range(20, 21).await;

    assert_eq!(
        report.outcome_for(&PostId::from(20)),
        Some(&PostOutcome::FetchFailed {
            cause: "HTTP 503".to_string()
        })
    );
    assert_eq!(report.archived(), 1);
    assert_eq!(report.failed(), 1);
}

#[tokio::test]
async fn test_persist_failure_is_recorded_and_batch_continues() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // A regular file where the records directory should be
    fs::write(output.path().join("posts"), "not a directory").unwrap();

    mount_page(&server, "/30", tistory_page("Blocked", "<p>ok</p>")).await;
    Mock::given(method("GET"))
        .and(path("/31"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(&server, "/32", tistory_page("Also blocked", "<p>ok</p>")).await;

    let config = test_config(PlatformKind::Tistory, &server.uri(), &output);
    let report = Coordinator::new(config).unwrap().archive_range(30, 32).await;

    assert_eq!(report.total(), 3);
    assert_eq!(report.archived(), 0);
    assert_eq!(report.failed(), 2);
    assert!(matches!(
        report.outcome_for(&PostId::from(30)),
        Some(PostOutcome::PersistFailed { .. })
    ));
    assert_eq!(report.outcome_for(&PostId::from(31)), Some(&PostOutcome::NotFound));
    assert!(matches!(
        report.outcome_for(&PostId::from(32)),
        Some(PostOutcome::PersistFailed { .. })
    ));
    assert!(output.path().join("posts").is_file());
}
