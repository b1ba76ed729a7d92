//! Rewrites local image references of a record body to absolute export URLs
//!
//! `![alt](../images/<id>/<file>)` becomes `![alt](<base>/<id>/<file>)`. Within
//! one body, an absolute URL is emitted once; later references to the same URL
//! are dropped. Remote references (downloads that failed at archive time) are
//! left untouched.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use url::Url;

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("image pattern is valid"))
}

/// Maps archive-relative image paths onto an external base URL
#[derive(Debug, Clone)]
pub struct ImageRewriter {
    base_url: String,
    marker: String,
}

impl ImageRewriter {
    /// `images_root` is the directory name used in record paths, e.g. `images`
    pub fn new(base_url: &str, images_root: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            marker: format!("/{}/", images_root.trim_matches('/')),
        }
    }

    /// Absolute URL for a record-relative path, or `None` if the path is not
    /// under the images root or is already an absolute URL
    pub fn absolute_url(&self, path: &str) -> Option<String> {
        if Url::parse(path).is_ok() {
            return None;
        }
        let (_, suffix) = path.split_once(&self.marker)?;
        let segments: Vec<&str> = suffix.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => None,
            [only] => Some(format!("{}/{}", self.base_url, only)),
            [post_dir, .., filename] => Some(format!("{}/{}/{}", self.base_url, post_dir, filename)),
        }
    }

    /// Rewrites every image reference of one body, dropping repeats
    pub fn rewrite(&self, markdown: &str) -> String {
        let mut seen: HashSet<String> = HashSet::new();

        image_pattern()
            .replace_all(markdown, |caps: &Captures<'_>| {
                let alt = &caps[1];
                let target = link_destination(&caps[2]);

                match self.absolute_url(target) {
                    Some(url) => {
                        if seen.insert(url.clone()) {
                            format!("![{}]({})", alt, url)
                        } else {
                            tracing::debug!("Dropping repeated image {}", url);
                            String::new()
                        }
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Destination part of a link target: drops an optional title and angle brackets
fn link_destination(target: &str) -> &str {
    let target = target.trim();
    if let Some(inner) = target.strip_prefix('<') {
        return inner.split('>').next().unwrap_or(inner);
    }
    target.split_whitespace().next().unwrap_or(target)
}
