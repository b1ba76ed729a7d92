use quire::config::Config;
use quire::PlatformKind;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Configuration pointing a platform profile at the mock server
pub fn test_config(kind: PlatformKind, base_url: &str, output: &TempDir) -> Config {
    let mut config = Config::default();
    config.platform.kind = kind;
    config.platform.blog_id = "kicho".to_string();
    config.platform.base_url = Some(base_url.to_string());
    config.archive.output_dir = output.path().to_string_lossy().to_string();
    config.archive.workers = 3;
    config
}

/// Sorted names of the files in a directory, empty if it does not exist
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// A Tistory style post page
pub fn tistory_page(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <h3 class="title">{title}</h3>
        <span class="date">2021. 7. 19. 23:31</span>
        <div class="category">Travel (3)</div>
        <div class="article">{body}</div>
        </body></html>"#
    )
}
