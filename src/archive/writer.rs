//! Archive record writer
//!
//! Renders an extracted post (with its images already pointed at local files)
//! into `<output>/posts/<id>.md`: a frontmatter header followed by the body
//! converted to Markdown.

use std::path::{Path, PathBuf};

use crate::crawler::ExtractedPost;
use crate::platform::PostId;

use super::fragment::BodyFragment;
use super::frontmatter::{render_frontmatter, RecordMetadata};
use super::persist::{write_atomic, PersistError};

/// Directory holding the records, relative to the output directory
pub const POSTS_DIR: &str = "posts";

/// File extension of a record
pub const RECORD_EXTENSION: &str = "md";

/// Writes archive records under one output directory
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    posts_dir: PathBuf,
}

impl ArchiveWriter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            posts_dir: output_dir.join(POSTS_DIR),
        }
    }

    /// Writes the record of `post`, replacing any earlier one atomically
    pub fn write(&self, post: &ExtractedPost) -> Result<PathBuf, PersistError> {
        let content = render_record(post);
        let path = write_atomic(&self.posts_dir, &record_filename(&post.id), content.as_bytes())?;
        tracing::debug!("Wrote record {}", path.display());
        Ok(path)
    }
}

fn record_filename(id: &PostId) -> String {
    format!("{}.{}", id, RECORD_EXTENSION)
}

/// Full text of a record: header, blank line, Markdown body
pub fn render_record(post: &ExtractedPost) -> String {
    let meta = RecordMetadata {
        title: post.title.clone(),
        date: post.published_at.clone(),
        category: post.category.clone(),
        id: post.id.to_string(),
        url: post.url.clone(),
    };

    let mut record = render_frontmatter(&meta);
    let body = body_to_markdown(&post.body);
    record.push_str(body.trim());
    record.push('\n');
    record
}

/// Converts a body fragment to Markdown
///
/// Falls back to the fragment's plain text if conversion fails.
pub fn body_to_markdown(body: &BodyFragment) -> String {
    let html = body.to_html();
    match htmd::convert(&html) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::warn!("Markdown conversion failed, keeping plain text: {}", e);
            body.text()
        }
    }
}
