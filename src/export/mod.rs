//! Export of an archive into one WXR document
//!
//! Records are read in identifier order. For each record:
//! - local image paths are rewritten to absolute URLs under the export base URL,
//!   with repeated images in one body dropped
//! - the Markdown body is rendered to HTML and images get a responsive style
//! - the date is normalized to `YYYY-MM-DD HH:MM:SS`
//!
//! A malformed record is skipped with a warning; it never aborts the export.

mod dates;
mod rewrite;
mod wxr;

pub use dates::{normalize_date, parse_date, EXPORT_DATE_FORMAT};
pub use rewrite::ImageRewriter;
pub use wxr::{
    category_nicename, cdata, escape_xml, render_document, Channel, ExportItem, WxrDocument,
};

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::Utc;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::archive::{read_archive, write_atomic, ArchivedPost};
use crate::config::Config;
use crate::Result;

/// Title used when a record has none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Category used when a record has none
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Style added to every exported image
const IMAGE_STYLE: &str = "max-width: 100%; height: auto;";

/// The rendered export: channel data plus one item per readable record
#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub channel: Channel,
    pub items: Vec<ExportItem>,
}

impl ExportDocument {
    pub fn to_xml(&self) -> String {
        render_document(&self.channel, &self.items)
    }

    /// Writes the document atomically, returning its path
    pub fn write_to(&self, path: &Path) -> Result<PathBuf> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("wordpress_import.xml");
        Ok(write_atomic(dir, filename, self.to_xml().as_bytes())?)
    }
}

/// Turns archive records into export items
#[derive(Debug, Clone)]
pub struct Exporter {
    rewriter: ImageRewriter,
    channel: Channel,
}

impl Exporter {
    pub fn new(base_url: &str, images_root: &str, channel: Channel) -> Self {
        Self {
            rewriter: ImageRewriter::new(base_url, images_root),
            channel,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let channel = Channel {
            title: config.export.site_title.clone(),
            link: config.export.site_link.clone(),
            description: format!("Backup of {}", config.platform.blog_id),
            pub_date: Utc::now().to_rfc2822(),
        };
        Self::new(&config.export.base_url, &config.archive.images_root, channel)
    }

    /// Reads every record under `archive_dir` and builds the document
    pub fn export_all(&self, archive_dir: &Path) -> Result<ExportDocument> {
        let posts = read_archive(archive_dir)?;
        tracing::info!("Found {} posts to export", posts.len());

        let items = posts.iter().map(|post| self.export_item(post)).collect();
        Ok(ExportDocument {
            channel: self.channel.clone(),
            items,
        })
    }

    /// Builds the export item of one record
    pub fn export_item(&self, post: &ArchivedPost) -> ExportItem {
        let markdown = self.rewriter.rewrite(&post.body);
        ExportItem {
            post_id: post.id.to_string(),
            title: post.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            link: post.url.clone().unwrap_or_default(),
            date: normalize_date(post.date.as_deref().unwrap_or("")),
            category: post
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            content: render_body(&markdown),
        }
    }
}

fn img_tag() -> &'static Regex {
    static IMG: OnceLock<Regex> = OnceLock::new();
    IMG.get_or_init(|| Regex::new(r"<img\s+").expect("img pattern is valid"))
}

/// Renders Markdown to HTML (tables and fenced code enabled) and styles images
pub fn render_body(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
    let mut rendered = String::new();
    html::push_html(&mut rendered, parser);

    img_tag()
        .replace_all(&rendered, format!("<img style=\"{}\" ", IMAGE_STYLE).as_str())
        .into_owned()
}

/// Exports the archive of `config` into its configured output file
pub fn run_export(config: &Config) -> Result<PathBuf> {
    let exporter = Exporter::from_config(config);
    let document = exporter.export_all(Path::new(&config.archive.output_dir))?;
    let path = document.write_to(Path::new(&config.export.output_file))?;
    tracing::info!(
        "Exported {} posts to {}",
        document.items.len(),
        path.display()
    );
    Ok(path)
}
