//! Image resolution for extracted posts
//!
//! For every `<img>` in a post body, in document order:
//! 1. Pick the effective source (lazy-load attribute first, then `src`)
//! 2. Skip empty, inline and placeholder sources
//! 3. Reuse a name already resolved in this run, or an asset already on disk
//! 4. Otherwise download it once, name it, and store it atomically
//! 5. Point the element at the local copy and drop competing source attributes
//!
//! A failed download leaves the element pointing at the remote URL.

use std::path::PathBuf;

use reqwest::Client;
use url::Url;

use crate::archive::{write_atomic, ContentElement};
use crate::crawler::{fetch_asset, ExtractedPost};
use crate::platform::PlatformProfile;

use super::ledger::AssetLedger;
use super::naming::{
    extension_for_content_type, filename_from_url, split_extension, synthesize_filename,
    KNOWN_EXTENSIONS,
};

/// Counts of what happened to the images of one post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    /// Image elements pointed at a local file
    pub rewritten: usize,
    /// Distinct local files the body now references
    pub distinct_assets: usize,
    /// Image elements whose download failed and still point remote
    pub failed: usize,
    /// Placeholder, inline or empty sources left untouched
    pub ignored: usize,
}

/// Outcome for a single image element
enum ImageResolution {
    Local(String),
    Failed,
    Ignored,
}

/// Downloads and rewrites the images of posts
pub struct AssetResolver<'a> {
    client: &'a Client,
    profile: &'a PlatformProfile,
    /// `<output>/<images-root>`
    images_dir: PathBuf,
    /// `<output>/.assets`
    manifest_dir: PathBuf,
    /// Directory name used in the relative references, e.g. `images`
    images_root: String,
}

impl<'a> AssetResolver<'a> {
    pub fn new(
        client: &'a Client,
        profile: &'a PlatformProfile,
        images_dir: PathBuf,
        manifest_dir: PathBuf,
        images_root: &str,
    ) -> Self {
        Self {
            client,
            profile,
            images_dir,
            manifest_dir,
            images_root: images_root.to_string(),
        }
    }

    /// Resolves every image of `post`, rewriting its body in place
    pub async fn resolve(&self, post: &mut ExtractedPost) -> ResolveSummary {
        let mut ledger = AssetLedger::open(
            self.images_dir.join(post.id.as_str()),
            self.manifest_dir.clone(),
            post.id.as_str(),
        );
        let base = Url::parse(&post.url).ok();
        let mut summary = ResolveSummary::default();

        for image in post.body.images_mut() {
            match self.resolve_image(image, base.as_ref(), &mut ledger).await {
                ImageResolution::Local(filename) => {
                    let local = format!("../{}/{}/{}", self.images_root, post.id, filename);
                    self.point_to_local(image, &local);
                    summary.rewritten += 1;
                }
                ImageResolution::Failed => summary.failed += 1,
                ImageResolution::Ignored => summary.ignored += 1,
            }
        }

        summary.distinct_assets = ledger.resolved_count();
        if let Err(e) = ledger.save() {
            tracing::warn!("Failed to save asset manifest for post {}: {}", post.id, e);
        }

        summary
    }

    /// Effective source of an image: the first lazy attribute, else `src`
    pub fn effective_source<'e>(&self, image: &'e ContentElement) -> Option<&'e str> {
        self.profile
            .lazy_attributes
            .iter()
            .filter_map(|attr| image.attr(attr))
            .chain(image.attr("src"))
            .map(str::trim)
            .find(|source| !source.is_empty())
    }

    async fn resolve_image(
        &self,
        image: &ContentElement,
        base: Option<&Url>,
        ledger: &mut AssetLedger,
    ) -> ImageResolution {
        let Some(source) = self.effective_source(image) else {
            return ImageResolution::Ignored;
        };

        if source.starts_with("data:") || self.profile.is_placeholder(source) {
            tracing::debug!("Ignoring placeholder image {}", source);
            return ImageResolution::Ignored;
        }

        let resolved = match base {
            Some(base) => base.join(source),
            None => Url::parse(source),
        };
        let url = match resolved {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => url,
            _ => {
                tracing::debug!("Ignoring non-HTTP image source {}", source);
                return ImageResolution::Ignored;
            }
        };
        let url_str = url.as_str();

        if let Some(existing) = ledger.lookup(url_str) {
            tracing::debug!("Reusing {} for repeated image {}", existing, url_str);
            return ImageResolution::Local(existing.to_string());
        }

        let derived = filename_from_url(&url).unwrap_or_else(|| synthesize_filename(url_str));
        let (stem, ext) = split_extension(&derived);
        let stem = stem.to_string();

        // Known extension: the name is final before any download
        if let Some(ext) = ext {
            let claim = ledger.claim(&stem, ext, url_str);
            if claim.materialized {
                tracing::debug!("Asset {} already present, skipping download", claim.filename);
                ledger.record(url_str, &claim.filename);
                return ImageResolution::Local(claim.filename);
            }
            return match self.download(url_str).await {
                Some(payload) => self.store(ledger, url_str, &claim.filename, &payload.bytes),
                None => ImageResolution::Failed,
            };
        }

        // No extension: an earlier run may have stored it under an inferred one
        if let Some(existing) = ledger.find_materialized(&stem, &KNOWN_EXTENSIONS, url_str) {
            tracing::debug!("Asset {} already present, skipping download", existing);
            ledger.record(url_str, &existing);
            return ImageResolution::Local(existing);
        }

        let Some(payload) = self.download(url_str).await else {
            return ImageResolution::Failed;
        };
        let ext = extension_for_content_type(&payload.content_type);
        let claim = ledger.claim(&stem, ext, url_str);
        if claim.materialized {
            ledger.record(url_str, &claim.filename);
            return ImageResolution::Local(claim.filename);
        }
        self.store(ledger, url_str, &claim.filename, &payload.bytes)
    }

    async fn download(&self, url: &str) -> Option<crate::crawler::AssetPayload> {
        match fetch_asset(self.client, url, &self.profile.referer).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!("Error downloading image {}: {}", url, e);
                None
            }
        }
    }

    fn store(
        &self,
        ledger: &mut AssetLedger,
        url: &str,
        filename: &str,
        bytes: &[u8],
    ) -> ImageResolution {
        match write_atomic(ledger.dir(), filename, bytes) {
            Ok(_) => {
                ledger.record(url, filename);
                ImageResolution::Local(filename.to_string())
            }
            Err(e) => {
                tracing::warn!("Error storing image {}: {}", url, e);
                ImageResolution::Failed
            }
        }
    }

    /// Points an image at its local copy
    ///
    /// `srcset` and lazy attributes are removed; renderers would otherwise keep
    /// loading the remote original.
    fn point_to_local(&self, image: &mut ContentElement, local: &str) {
        image.set_attr("src", local);
        image.remove_attr("srcset");
        for attr in &self.profile.lazy_attributes {
            image.remove_attr(attr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(attrs: &[(&str, &str)]) -> ContentElement {
        let mut element = ContentElement::new("img");
        for (key, value) in attrs {
            element.set_attr(key, value);
        }
        element
    }

    #[test]
    fn test_effective_source_prefers_lazy_attributes() {
        let client = Client::new();
        let profile = PlatformProfile::naver("kicho_57", None);
        let resolver = AssetResolver::new(
            &client,
            &profile,
            PathBuf::from("/tmp/images"),
            PathBuf::from("/tmp/.assets"),
            "images",
        );

        let img = image(&[
            ("src", "https://ssl.pstatic.net/blank.gif"),
            ("data-src", "https://cdn.example.com/medium.jpg"),
            ("data-lazy-src", "https://cdn.example.com/large.jpg"),
        ]);
        assert_eq!(
            resolver.effective_source(&img),
            Some("https://cdn.example.com/large.jpg")
        );

        let img = image(&[("src", "https://cdn.example.com/plain.jpg"), ("data-src", " ")]);
        assert_eq!(
            resolver.effective_source(&img),
            Some("https://cdn.example.com/plain.jpg")
        );

        assert_eq!(resolver.effective_source(&image(&[("src", "")])), None);
    }

    #[test]
    fn test_point_to_local_strips_competing_sources() {
        let client = Client::new();
        let profile = PlatformProfile::naver("kicho_57", None);
        let resolver = AssetResolver::new(
            &client,
            &profile,
            PathBuf::from("/tmp/images"),
            PathBuf::from("/tmp/.assets"),
            "images",
        );

        let mut img = image(&[
            ("src", "https://cdn.example.com/a.jpg"),
            ("srcset", "https://cdn.example.com/a2.jpg 2x"),
            ("data-lazy-src", "https://cdn.example.com/a.jpg"),
            ("alt", "cat"),
        ]);
        resolver.point_to_local(&mut img, "../images/1/a.jpg");

        assert_eq!(img.attr("src"), Some("../images/1/a.jpg"));
        assert_eq!(img.attr("srcset"), None);
        assert_eq!(img.attr("data-lazy-src"), None);
        assert_eq!(img.attr("alt"), Some("cat"));
    }

    // Download, dedup and idempotence behavior is covered with wiremock in the
    // integration tests
}
