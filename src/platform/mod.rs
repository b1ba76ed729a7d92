//! Platform profiles
//!
//! A profile is pure data describing one hosted blogging platform: how post and
//! listing URLs are built, which selector chains locate each field, which image
//! attributes carry lazy-loaded sources, and which sources are placeholders.
//! Supporting a new template variant means adding selectors, not branches.

mod post_id;
mod selectors;

pub use post_id::PostId;
pub use selectors::{element_text, SelectorChain};

use clap::ValueEnum;
use serde::Deserialize;

use crate::config::PlatformConfig;

/// Built-in platform families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// One post per numeric path segment, enumerated by identifier range
    #[default]
    Tistory,
    /// Posts enumerated through a paged listing API
    Naver,
}

/// Everything the pipeline needs to know about a platform
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub kind: PlatformKind,

    /// Blog identifier on the platform
    pub blog_id: String,

    /// Scheme + host that post URLs are built from, without trailing slash
    pub origin: String,

    /// Referer sent with asset requests; image hosts reject bare requests
    pub referer: String,

    pub title: SelectorChain,
    pub date: SelectorChain,
    pub category: SelectorChain,
    pub body: SelectorChain,

    /// A post without a body container is skipped rather than archived empty
    pub body_required: bool,

    /// A listing-supplied title may stand in for a missing title element
    pub title_hint_allowed: bool,

    /// Image attributes holding the real source, in preference order
    pub lazy_attributes: Vec<String>,

    /// Substrings marking spacer or placeholder images
    pub placeholder_markers: Vec<String>,
}

impl PlatformProfile {
    /// Builds the profile selected by the configuration
    pub fn from_config(config: &PlatformConfig) -> Self {
        let origin = config.base_url.as_deref().map(|u| u.trim_end_matches('/').to_string());
        match config.kind {
            PlatformKind::Tistory => Self::tistory(&config.blog_id, origin),
            PlatformKind::Naver => Self::naver(&config.blog_id, origin),
        }
    }

    /// Profile for a blog addressed as `https://<blog>.tistory.com/<id>`
    pub fn tistory(blog_id: &str, origin: Option<String>) -> Self {
        let origin = origin.unwrap_or_else(|| format!("https://{}.tistory.com", blog_id));
        Self {
            kind: PlatformKind::Tistory,
            blog_id: blog_id.to_string(),
            referer: format!("{}/", origin),
            origin,
            title: SelectorChain::new(["h3.title", ".entry-title", ".title"]),
            date: SelectorChain::new([".date", ".time", ".published"]),
            category: SelectorChain::new([".category", ".entry-category"]),
            body: SelectorChain::new([
                ".article",
                ".entry-content",
                ".tt_article_useless_p_margin",
            ]),
            body_required: false,
            title_hint_allowed: false,
            lazy_attributes: vec!["data-lazy-src".to_string(), "data-src".to_string()],
            placeholder_markers: vec!["blank".to_string(), "pixel".to_string()],
        }
    }

    /// Profile for a blog addressed through `PostView.naver?blogId=..&logNo=..`
    pub fn naver(blog_id: &str, origin: Option<String>) -> Self {
        let origin = origin.unwrap_or_else(|| "https://blog.naver.com".to_string());
        Self {
            kind: PlatformKind::Naver,
            blog_id: blog_id.to_string(),
            referer: format!("{}/", origin),
            origin,
            title: SelectorChain::new([
                ".se-title-text",
                ".se_title .se_textarea",
                ".pcol1",
                ".htitle",
            ]),
            date: SelectorChain::new([".se_publishDate", ".date"]),
            category: SelectorChain::new([".blog2_series a", ".pcol2 a"]),
            body: SelectorChain::new([".se-main-container", "#post-view{id}"]),
            body_required: true,
            title_hint_allowed: true,
            lazy_attributes: vec!["data-lazy-src".to_string(), "data-src".to_string()],
            placeholder_markers: vec!["blank".to_string(), "pixel".to_string()],
        }
    }

    /// URL of the page showing one post
    pub fn post_url(&self, id: &PostId) -> String {
        match self.kind {
            PlatformKind::Tistory => format!("{}/{}", self.origin, id),
            PlatformKind::Naver => format!(
                "{}/PostView.naver?blogId={}&logNo={}",
                self.origin, self.blog_id, id
            ),
        }
    }

    /// Endpoint of the paged post listing, for platforms that have one
    pub fn listing_url(&self) -> Option<String> {
        match self.kind {
            PlatformKind::Tistory => None,
            PlatformKind::Naver => Some(format!("{}/PostTitleListAsync.naver", self.origin)),
        }
    }

    /// Returns true if an image source is a spacer or placeholder
    pub fn is_placeholder(&self, source: &str) -> bool {
        self.placeholder_markers
            .iter()
            .any(|marker| source.contains(marker.as_str()))
    }
}
