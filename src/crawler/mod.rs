//! Remote side of an archive run
//!
//! This module contains everything that talks to the blogging platform:
//! - HTTP fetching of post pages and image assets
//! - Paged post listings
//! - Content extraction through the platform's selector chains
//! - Bounded parallel coordination of the per-post pipeline

mod coordinator;
mod extractor;
mod fetcher;
mod listing;

pub use coordinator::{run_archive_listing, run_archive_range, Coordinator, WorkUnit};
pub use extractor::{clean_category, extract, ExtractedPost, Extraction, PostHint};
pub use fetcher::{
    build_http_client, fetch_asset, fetch_document, fetch_post, AssetPayload, RawDocument,
    BROWSER_USER_AGENT,
};
pub use listing::{decode_title, fetch_post_list, parse_listing_page, ListedPost};
