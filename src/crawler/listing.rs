//! Paged post listing
//!
//! Listing platforms expose an endpoint returning one page of post titles at a
//! time. Pages are requested in order and accumulated until a short or empty
//! page. A page that fails to download or parse ends the listing early; what was
//! already collected is kept.

use crate::config::ListingConfig;
use crate::platform::{PlatformProfile, PostId};
use crate::QuireError;
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;

/// One entry of the remote post listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedPost {
    pub id: PostId,
    pub title: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(rename = "postList")]
    post_list: Option<Vec<ListingEntry>>,
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    #[serde(rename = "logNo")]
    log_no: serde_json::Value,
    #[serde(default)]
    title: String,
    #[serde(rename = "addDate", default)]
    add_date: String,
}

/// Fetches every listed post of a collection
///
/// # Returns
///
/// * `Ok(Vec<ListedPost>)` - Posts accumulated over all readable pages
/// * `Err(QuireError)` - The platform has no listing endpoint
pub async fn fetch_post_list(
    client: &Client,
    profile: &PlatformProfile,
    collection_id: &str,
    config: &ListingConfig,
) -> Result<Vec<ListedPost>, QuireError> {
    let endpoint = profile.listing_url().ok_or_else(|| QuireError::Listing {
        page: 0,
        message: format!("platform {:?} has no listing endpoint", profile.kind),
    })?;

    tracing::info!("Fetching post list for {}", collection_id);

    let mut posts = Vec::new();
    for page in 1..=config.max_pages {
        let current_page = match fetch_listing_page(client, &endpoint, collection_id, page, config.page_size).await {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                tracing::debug!("Page {} has no post list, listing complete", page);
                break;
            }
            Err(e) => {
                tracing::warn!("Stopping listing early: {}", e);
                break;
            }
        };

        if current_page.is_empty() {
            break;
        }

        let page_len = current_page.len();
        posts.extend(current_page);
        tracing::info!(
            "Page {}: found {} posts (total so far: {})",
            page,
            page_len,
            posts.len()
        );

        if page_len < config.page_size as usize {
            break;
        }
    }

    Ok(posts)
}

async fn fetch_listing_page(
    client: &Client,
    endpoint: &str,
    collection_id: &str,
    page: u32,
    page_size: u32,
) -> Result<Option<Vec<ListedPost>>, QuireError> {
    let current_page = page.to_string();
    let count_per_page = page_size.to_string();
    let response = client
        .get(endpoint)
        .query(&[
            ("blogId", collection_id),
            ("viewdate", ""),
            ("currentPage", current_page.as_str()),
            ("categoryNo", ""),
            ("parentCategoryNo", ""),
            ("countPerPage", count_per_page.as_str()),
        ])
        .send()
        .await
        .map_err(|source| QuireError::Http {
            url: endpoint.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(QuireError::Status {
            url: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    let text = response.text().await.map_err(|source| QuireError::Http {
        url: endpoint.to_string(),
        source,
    })?;

    parse_listing_page(&text).map_err(|message| QuireError::Listing { page, message })
}

/// Parses one listing page body
///
/// The endpoint escapes apostrophes as `\'`, which is not valid JSON, so those
/// are normalized first. Returns `Ok(None)` when the body has no `postList`.
pub fn parse_listing_page(text: &str) -> Result<Option<Vec<ListedPost>>, String> {
    let cleaned = text.replace("\\'", "'");
    let page: ListingPage = serde_json::from_str(&cleaned).map_err(|e| e.to_string())?;

    let Some(entries) = page.post_list else {
        return Ok(None);
    };

    entries
        .into_iter()
        .map(|entry| {
            let raw_id = match &entry.log_no {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let id = raw_id.parse::<PostId>()?;
            Ok(ListedPost {
                id,
                title: decode_title(&entry.title),
                date: entry.add_date.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, String>>()
        .map(Some)
}

/// Titles arrive form-encoded and may also carry HTML entities
pub fn decode_title(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced)
        .map(|cow| cow.into_owned())
        .unwrap_or(spaced);
    let fragment = Html::parse_fragment(&decoded);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}
