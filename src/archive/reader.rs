//! Archive record reader
//!
//! Loads `posts/*.md` back into structured posts, ordered by identifier.

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform::PostId;
use crate::{QuireError, Result};

use super::frontmatter::{parse_metadata, split_record};
use super::writer::{POSTS_DIR, RECORD_EXTENSION};

/// A record read back from the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedPost {
    pub id: PostId,
    pub title: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub url: Option<String>,
    /// Markdown body, untouched
    pub body: String,
    pub path: PathBuf,
}

/// Lists the record files of an archive, ascending by identifier
pub fn list_records(archive_dir: &Path) -> Result<Vec<(PostId, PathBuf)>> {
    let posts_dir = archive_dir.join(POSTS_DIR);
    let mut records = Vec::new();

    for entry in fs::read_dir(&posts_dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
            continue;
        }
        let Some(id) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<PostId>().ok())
        else {
            tracing::debug!("Ignoring {} (not a post identifier)", path.display());
            continue;
        };
        records.push((id, path));
    }

    records.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(records)
}

/// Reads and parses one record
pub fn read_record(id: &PostId, path: &Path) -> Result<ArchivedPost> {
    let content = fs::read_to_string(path)?;
    let malformed = |message: &str| QuireError::MalformedRecord {
        path: path.display().to_string(),
        message: message.to_string(),
    };

    let (block, body) = split_record(&content).ok_or_else(|| malformed("missing metadata header"))?;
    let mut meta = parse_metadata(block);
    if meta.is_empty() {
        return Err(malformed("empty metadata header"));
    }

    let mut take = |key: &str| meta.remove(key).filter(|v| !v.trim().is_empty());

    if let Some(declared) = take("id") {
        if declared != id.as_str() {
            tracing::debug!(
                "Record {} declares id {}, using the filename",
                path.display(),
                declared
            );
        }
    }

    Ok(ArchivedPost {
        id: id.clone(),
        title: take("title"),
        date: take("date"),
        category: take("category"),
        url: take("url"),
        body: body.to_string(),
        path: path.to_path_buf(),
    })
}

/// Reads every record of an archive
///
/// Malformed or unreadable records are skipped with a warning.
pub fn read_archive(archive_dir: &Path) -> Result<Vec<ArchivedPost>> {
    let mut posts = Vec::new();
    for (id, path) in list_records(archive_dir)? {
        match read_record(&id, &path) {
            Ok(post) => posts.push(post),
            Err(e) => tracing::warn!("Skipping record {}: {}", path.display(), e),
        }
    }
    Ok(posts)
}
