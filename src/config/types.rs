use serde::Deserialize;

use crate::platform::PlatformKind;

/// Main configuration structure for Quire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Which remote platform to archive from
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Platform profile to use
    #[serde(default)]
    pub kind: PlatformKind,

    /// Blog identifier on the platform (subdomain or blog id)
    #[serde(rename = "blog-id", default = "default_blog_id")]
    pub blog_id: String,

    /// Overrides the platform's origin (scheme + host), mainly for mirrors
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            kind: PlatformKind::default(),
            blog_id: default_blog_id(),
            base_url: None,
        }
    }
}

/// Archive run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Root directory holding `posts/` and the images root
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,

    /// Number of posts processed concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum number of listed posts to archive (0 = all)
    #[serde(default)]
    pub limit: usize,

    /// Directory name (under `output-dir`) holding per-post image folders
    #[serde(rename = "images-root", default = "default_images_root")]
    pub images_root: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            workers: default_workers(),
            limit: 0,
            images_root: default_images_root(),
        }
    }
}

/// Paged listing API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    /// Items requested per page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages requested
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

/// Export document configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Externally reachable URL that serves the images root
    #[serde(rename = "base-url", default = "default_export_base_url")]
    pub base_url: String,

    /// Path of the generated WXR document
    #[serde(rename = "output-file", default = "default_export_file")]
    pub output_file: String,

    /// Channel title of the export document
    #[serde(rename = "site-title", default = "default_site_title")]
    pub site_title: String,

    /// Channel link of the export document
    #[serde(rename = "site-link", default = "default_site_link")]
    pub site_link: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: default_export_base_url(),
            output_file: default_export_file(),
            site_title: default_site_title(),
            site_link: default_site_link(),
        }
    }
}

fn default_blog_id() -> String {
    "kicho".to_string()
}

fn default_output_dir() -> String {
    "backup".to_string()
}

fn default_workers() -> usize {
    10
}

fn default_images_root() -> String {
    "images".to_string()
}

fn default_page_size() -> u32 {
    30
}

fn default_max_pages() -> u32 {
    100
}

fn default_export_base_url() -> String {
    "http://localhost:8000/images".to_string()
}

fn default_export_file() -> String {
    "wordpress_import.xml".to_string()
}

fn default_site_title() -> String {
    "Blog Backup".to_string()
}

fn default_site_link() -> String {
    "http://localhost".to_string()
}
