//! Asset handling for archived posts
//!
//! This module downloads the images embedded in post bodies and rewrites the
//! references to local relative paths:
//! - `naming`: filenames derived from URLs, extension inference from Content-Type
//! - `ledger`: per-post dedup state and the on-disk source manifest
//! - `resolver`: the per-image resolution loop

mod ledger;
mod naming;
mod resolver;

pub use ledger::{AssetLedger, NameClaim, MANIFEST_DIR};
pub use naming::{
    candidate_name, extension_for_content_type, filename_from_url, split_extension,
    synthesize_filename, KNOWN_EXTENSIONS, MAX_EXTENSION_LEN, MAX_FILENAME_LEN,
};
pub use resolver::{AssetResolver, ResolveSummary};
