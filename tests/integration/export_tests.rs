//! Export of archives written to disk

use quire::config::Config;
use quire::export::{run_export, Channel, Exporter};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_record(root: &Path, id: &str, content: &str) {
    let posts = root.join("posts");
    fs::create_dir_all(&posts).unwrap();
    fs::write(posts.join(format!("{}.md", id)), content).unwrap();
}

fn exporter() -> Exporter {
    Exporter::new(
        "https://cdn.example.org/backup/images/",
        "images",
        Channel {
            title: "Blog Backup".to_string(),
            link: "http://localhost".to_string(),
            description: "Backup".to_string(),
            pub_date: "Tue, 21 Jan 2026 00:00:00 +0000".to_string(),
        },
    )
}

#[test]
fn test_duplicate_local_image_exports_once() {
    let archive = TempDir::new().unwrap();
    write_record(
        archive.path(),
        "12",
        "---\ntitle: \"Dupes\"\ndate: \"2007. 4. 10. 11:32\"\nid: 12\nurl: \"https://kicho.tistory.com/12\"\n---\n\n\
         ![a](../images/12/cat.jpg)\n\nText\n\n![a](../images/12/cat.jpg)\n",
    );

    let document = exporter().export_all(archive.path()).unwrap();
    assert_eq!(document.items.len(), 1);

    let xml = document.to_xml();
    assert_eq!(
        xml.matches("https://cdn.example.org/backup/images/12/cat.jpg").count(),
        1
    );
    assert!(xml.contains("<wp:post_date>2007-04-10 11:32:00</wp:post_date>"));
    assert!(xml.contains("style=\"max-width: 100%; height: auto;\""));
}

#[test]
fn test_items_ordered_and_malformed_records_skipped() {
    let archive = TempDir::new().unwrap();
    write_record(archive.path(), "30", "---\ntitle: \"Thirty\"\nid: 30\n---\n\nBody");
    write_record(archive.path(), "4", "---\ntitle: \"Four\"\nid: 4\n---\n\nBody");
    write_record(archive.path(), "5", "no metadata here");
    write_record(
        archive.path(),
        "17",
        "---\ntitle: \"Quote \"inside\" title\"\ndate: \"2026. 1. 19.\"\ncategory: \"Notes\"\nid: 17\n---\n\nBody",
    );

    let document = exporter().export_all(archive.path()).unwrap();
    let ids: Vec<_> = document.items.iter().map(|i| i.post_id.as_str()).collect();
    assert_eq!(ids, vec!["4", "17", "30"]);

    let fallback = &document.items[1];
    assert_eq!(fallback.title, "Quote \"inside\" title");
    assert_eq!(fallback.date, "2026-01-19 00:00:00");
    assert_eq!(fallback.category, "Notes");
    assert_eq!(document.items[0].category, "Uncategorized");
}

#[test]
fn test_body_with_delimiter_lines_survives_export() {
    let archive = TempDir::new().unwrap();
    write_record(
        archive.path(),
        "9",
        "---\ntitle: \"Rules\"\nid: 9\n---\n\nAbove\n\n---\n\nBelow\n",
    );

    let document = exporter().export_all(archive.path()).unwrap();
    let content = &document.items[0].content;
    assert!(content.contains("Above"));
    assert!(content.contains("<hr />"));
    assert!(content.contains("Below"));
}

#[test]
fn test_run_export_writes_configured_file() {
    let archive = TempDir::new().unwrap();
    write_record(
        archive.path(),
        "1",
        "---\ntitle: \"Only\"\nid: 1\nurl: \"https://blog.naver.com/PostView.naver?blogId=kicho_57&logNo=1\"\n---\n\nHi",
    );

    let mut config = Config::default();
    config.archive.output_dir = archive.path().to_string_lossy().to_string();
    config.export.output_file = archive
        .path()
        .join("out/import.xml")
        .to_string_lossy()
        .to_string();

    let path = run_export(&config).unwrap();
    let xml = fs::read_to_string(&path).unwrap();

    assert!(xml.contains("<title>Only</title>"));
    assert!(xml.contains("blogId=kicho_57&amp;logNo=1</link>"));
    assert!(xml.ends_with("</channel>\n</rss>\n"));
}

#[test]
fn test_failed_download_keeps_remote_url_in_export() {
    let archive = TempDir::new().unwrap();
    write_record(
        archive.path(),
        "21",
        "---\ntitle: \"Partial\"\nid: 21\n---\n\n\
         ![ok](../images/21/ok.gif)\n\n![gone](https://remote.example.com/images/2021/photo.jpg)\n",
    );

    let document = exporter().export_all(archive.path()).unwrap();
    let content = &document.items[0].content;

    assert!(content.contains("https://cdn.example.org/backup/images/21/ok.gif"));
    assert!(content.contains("https://remote.example.com/images/2021/photo.jpg"));
    assert!(!content.contains("https://cdn.example.org/backup/images/2021/photo.jpg"));
}
