//! Content extraction from fetched post pages
//!
//! This module locates the structural parts of a post page:
//! - Title, date and category text through the profile's selector chains
//! - The body container, copied into an owned `BodyFragment`
//!
//! A page without a recognizable title is not a post (protected posts,
//! redirects and placeholders look like this) and is reported as skipped.

use crate::archive::BodyFragment;
use crate::platform::{PlatformProfile, PostId};
use scraper::Html;

/// Metadata already known from a listing, used when the page lacks it
#[derive(Debug, Clone, Default)]
pub struct PostHint {
    pub title: Option<String>,
    pub date: Option<String>,
}

/// A post located in a fetched page
#[derive(Debug, Clone)]
pub struct ExtractedPost {
    pub id: PostId,
    /// URL the post was fetched from
    pub url: String,
    pub title: String,
    /// Publication date as displayed by the platform
    pub published_at: String,
    pub category: Option<String>,
    pub body: BodyFragment,
}

/// Result of extracting one page
#[derive(Debug, Clone)]
pub enum Extraction {
    Extracted(ExtractedPost),
    Skipped { reason: String },
}

/// Extracts a post from page markup
///
/// # Arguments
///
/// * `html` - The page markup
/// * `url` - The URL the page was served from
/// * `id` - The post identifier
/// * `profile` - Selector chains and policies of the platform
/// * `hint` - Listing metadata, if the post came from a listing
pub fn extract(
    html: &str,
    url: &str,
    id: &PostId,
    profile: &PlatformProfile,
    hint: Option<&PostHint>,
) -> Extraction {
    let document = Html::parse_document(html);

    let title = profile.title.first_text(&document, id).or_else(|| {
        if profile.title_hint_allowed {
            hint.and_then(|h| h.title.clone())
                .filter(|t| !t.trim().is_empty())
        } else {
            None
        }
    });

    let Some(title) = title else {
        return Extraction::Skipped {
            reason: "no title found".to_string(),
        };
    };

    let body = match profile.body.first_element(&document, id) {
        Some(element) => BodyFragment::from_element(element),
        None if profile.body_required => {
            return Extraction::Skipped {
                reason: "no body container found".to_string(),
            };
        }
        None => {
            tracing::debug!("No body container for post {}, archiving empty body", id);
            BodyFragment::default()
        }
    };

    let published_at = profile
        .date
        .first_text(&document, id)
        .or_else(|| hint.and_then(|h| h.date.clone()))
        .unwrap_or_default();

    let category = profile
        .category
        .first_text(&document, id)
        .and_then(|raw| clean_category(&raw));

    Extraction::Extracted(ExtractedPost {
        id: id.clone(),
        url: url.to_string(),
        title,
        published_at,
        category,
        body,
    })
}

/// Drops trailing count annotations such as "Travel (12)"
pub fn clean_category(raw: &str) -> Option<String> {
    let cleaned = raw.split('(').next().unwrap_or("").trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
