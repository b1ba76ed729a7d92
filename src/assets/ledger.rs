//! Per-post asset bookkeeping
//!
//! One `AssetLedger` exists per post and per run; it is never shared between
//! workers. It answers three questions for the resolver:
//! - was this remote URL already resolved in this run? (reuse its filename)
//! - is a file of this name already materialized for this URL? (skip the fetch)
//! - which name should a new asset get? (suffix on collision, never overwrite)
//!
//! Across runs, a source manifest (`<output>/.assets/<id>.json`) remembers the
//! remote URL behind every stored file, so a coincidental name collision with a
//! different URL gets a suffixed name instead of silently reusing the old file.
//! The manifest lives outside the images root so it is never published with
//! the assets.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::archive::{write_atomic, PersistError};

use super::naming::candidate_name;

/// Directory under the archive root holding one source manifest per post
pub const MANIFEST_DIR: &str = ".assets";

/// A filename chosen for a remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameClaim {
    pub filename: String,
    /// The file is already on disk for this URL; no download needed
    pub materialized: bool,
}

#[derive(Debug)]
pub struct AssetLedger {
    dir: PathBuf,
    manifest_dir: PathBuf,
    manifest_name: String,
    /// remote URL -> filename, for URLs resolved in this run
    by_url: HashMap<String, String>,
    /// filename -> remote URL, for names taken in this run
    claimed: HashMap<String, String>,
    /// filename -> remote URL, as persisted by earlier runs
    manifest: BTreeMap<String, String>,
    dirty: bool,
}

impl AssetLedger {
    /// Opens the ledger of one post's asset directory, reading the manifest
    /// `<manifest_dir>/<post_key>.json` if present
    pub fn open(dir: PathBuf, manifest_dir: PathBuf, post_key: &str) -> Self {
        let manifest_name = format!("{}.json", post_key);
        let manifest = read_manifest(&manifest_dir.join(&manifest_name));
        Self {
            dir,
            manifest_dir,
            manifest_name,
            by_url: HashMap::new(),
            claimed: HashMap::new(),
            manifest,
            dirty: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filename already assigned to this URL in this run
    pub fn lookup(&self, url: &str) -> Option<&str> {
        self.by_url.get(url).map(String::as_str)
    }

    /// Returns true if `filename` exists on disk and holds the asset for `url`
    ///
    /// A file with no manifest entry predates the manifest and is trusted.
    pub fn asset_already_materialized(&self, filename: &str, url: &str) -> bool {
        if !self.dir.join(filename).is_file() {
            return false;
        }
        match self.manifest.get(filename) {
            Some(source) => source == url,
            None => true,
        }
    }

    /// Finds an already materialized file for `url` among `stem` + each extension
    pub fn find_materialized(&self, stem: &str, extensions: &[&str], url: &str) -> Option<String> {
        extensions
            .iter()
            .map(|ext| candidate_name(stem, 0, ext))
            .find(|name| self.is_free_for(name, url) && self.asset_already_materialized(name, url))
    }

    /// Chooses the filename for `url`, suffixing `_1`, `_2`, ... on collision
    pub fn claim(&self, stem: &str, ext: &str, url: &str) -> NameClaim {
        let mut counter = 0;
        loop {
            let filename = candidate_name(stem, counter, ext);
            if self.is_free_for(&filename, url) {
                if self.asset_already_materialized(&filename, url) {
                    return NameClaim {
                        filename,
                        materialized: true,
                    };
                }
                if !self.dir.join(&filename).exists() {
                    return NameClaim {
                        filename,
                        materialized: false,
                    };
                }
            }
            counter += 1;
        }
    }

    /// Records that `filename` now holds the asset for `url`
    pub fn record(&mut self, url: &str, filename: &str) {
        self.by_url.insert(url.to_string(), filename.to_string());
        self.claimed.insert(filename.to_string(), url.to_string());
        if self.manifest.get(filename).map(String::as_str) != Some(url) {
            self.manifest.insert(filename.to_string(), url.to_string());
            self.dirty = true;
        }
    }

    /// Number of distinct assets resolved in this run
    pub fn resolved_count(&self) -> usize {
        self.by_url.len()
    }

    /// Persists the manifest if anything changed
    pub fn save(&mut self) -> Result<(), PersistError> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_vec_pretty(&self.manifest).map_err(|e| PersistError::Write {
            path: self.manifest_dir.join(&self.manifest_name).display().to_string(),
            source: e.into(),
        })?;
        write_atomic(&self.manifest_dir, &self.manifest_name, &json)?;
        self.dirty = false;
        Ok(())
    }

    /// A name is free unless another URL took it earlier in this run
    fn is_free_for(&self, filename: &str, url: &str) -> bool {
        match self.claimed.get(filename) {
            Some(owner) => owner == url,
            None => true,
        }
    }
}

fn read_manifest(path: &Path) -> BTreeMap<String, String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    match serde_json::from_str(&content) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!("Ignoring unreadable asset manifest {}: {}", path.display(), e);
            BTreeMap::new()
        }
    }
}
