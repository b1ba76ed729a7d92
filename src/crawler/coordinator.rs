//! Archive coordinator - bounded parallel processing of posts
//!
//! Every post is one unit of work, run in its own task:
//! 1. Fetch the post page
//! 2. Extract title, date, category and body
//! 3. Download images and point them at local copies
//! 4. Write the record
//!
//! A semaphore bounds how many units run at once. Units share nothing mutable
//! except the filesystem, and each post owns its record path and asset
//! directory. Any failure inside a unit, a panic included, becomes that unit's
//! outcome; the batch always runs to completion.

use crate::archive::{ensure_dir, ArchiveWriter};
use crate::assets::{AssetResolver, MANIFEST_DIR};
use crate::config::Config;
use crate::crawler::{
    build_http_client, extract, fetch_post, fetch_post_list, Extraction, PostHint, RawDocument,
};
use crate::platform::{PlatformProfile, PostId};
use crate::state::{PostOutcome, RunReport};
use crate::QuireError;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinError;

/// One post to archive
#[derive(Debug, Clone)]
pub struct WorkUnit {
    pub id: PostId,
    /// Listing metadata, when the post came from a listing
    pub hint: Option<PostHint>,
}

impl WorkUnit {
    pub fn new(id: PostId) -> Self {
        Self { id, hint: None }
    }
}

/// Everything a worker needs, shared read-only between tasks
struct UnitContext {
    client: Client,
    profile: PlatformProfile,
    writer: ArchiveWriter,
    images_dir: PathBuf,
    manifest_dir: PathBuf,
    images_root: String,
}

/// Runs archive batches for one configuration
pub struct Coordinator {
    context: Arc<UnitContext>,
    config: Arc<Config>,
}

impl Coordinator {
    /// Creates a coordinator with a freshly built HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Output directory is usable and the client is built
    /// * `Err(QuireError)` - Failed to initialize
    pub fn new(config: Config) -> Result<Self, QuireError> {
        let client = build_http_client()?;
        Self::with_client(config, client)
    }

    /// Creates a coordinator around an existing client
    pub fn with_client(config: Config, client: Client) -> Result<Self, QuireError> {
        let output_dir = PathBuf::from(&config.archive.output_dir);
        ensure_dir(&output_dir)?;

        let context = UnitContext {
            client,
            profile: PlatformProfile::from_config(&config.platform),
            writer: ArchiveWriter::new(&output_dir),
            images_dir: output_dir.join(&config.archive.images_root),
            manifest_dir: output_dir.join(MANIFEST_DIR),
            images_root: config.archive.images_root.clone(),
        };

        Ok(Self {
            context: Arc::new(context),
            config: Arc::new(config),
        })
    }

    /// Archives every identifier in `start..=end`
    pub async fn archive_range(&self, start: u64, end: u64) -> RunReport {
        tracing::info!("Archiving posts {} to {}", start, end);
        let units = (start..=end).map(|n| WorkUnit::new(PostId::from(n))).collect();
        self.run(units).await
    }

    /// Archives the posts of a listing collection
    ///
    /// `limit` of 0 archives everything listed; otherwise only the first
    /// `limit` posts are processed.
    pub async fn archive_listing(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<RunReport, QuireError> {
        let mut listed = fetch_post_list(
            &self.context.client,
            &self.context.profile,
            collection,
            &self.config.listing,
        )
        .await?;

        tracing::info!("Listing returned {} posts", listed.len());
        if limit > 0 && listed.len() > limit {
            tracing::info!("Limiting to first {} posts", limit);
            listed.truncate(limit);
        }

        let units = listed
            .into_iter()
            .map(|post| WorkUnit {
                id: post.id,
                hint: Some(PostHint {
                    title: Some(post.title),
                    date: Some(post.date),
                }),
            })
            .collect();

        Ok(self.run(units).await)
    }

    /// Processes `units` with at most `archive.workers` running at once
    pub async fn run(&self, units: Vec<WorkUnit>) -> RunReport {
        let workers = self.config.archive.workers.max(1);
        let semaphore = Arc::new(Semaphore::new(workers));
        let start_time = Instant::now();

        tracing::info!("Processing {} posts with {} workers", units.len(), workers);

        let mut handles = Vec::with_capacity(units.len());
        for unit in units {
            let id = unit.id.clone();
            let context = Arc::clone(&self.context);
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return PostOutcome::Crashed {
                            cause: e.to_string(),
                        }
                    }
                };
                process_unit(&context, unit).await
            });
            handles.push((id, handle));
        }

        let mut report = RunReport::default();
        for (id, handle) in handles {
            let outcome = join_outcome(handle.await);
            log_outcome(&id, &outcome);
            report.record(id, outcome);
        }

        tracing::info!(
            "Run finished in {:.1}s: {} archived, {} skipped, {} failed ({} total)",
            start_time.elapsed().as_secs_f64(),
            report.archived(),
            report.skipped(),
            report.failed(),
            report.total()
        );

        report
    }
}

/// Runs one post through fetch, extract, resolve and write
async fn process_unit(context: &UnitContext, unit: WorkUnit) -> PostOutcome {
    let (url, html) = match fetch_post(&context.client, &context.profile, &unit.id).await {
        RawDocument::Found { url, body } => (url, body),
        RawDocument::NotFound => return PostOutcome::NotFound,
        RawDocument::TransientError { cause } => return PostOutcome::FetchFailed { cause },
    };

    let mut post = match extract(&html, &url, &unit.id, &context.profile, unit.hint.as_ref()) {
        Extraction::Extracted(post) => post,
        Extraction::Skipped { reason } => return PostOutcome::Skipped { reason },
    };

    let resolver = AssetResolver::new(
        &context.client,
        &context.profile,
        context.images_dir.clone(),
        context.manifest_dir.clone(),
        &context.images_root,
    );
    let summary = resolver.resolve(&mut post).await;

    if let Err(e) = context.writer.write(&post) {
        return PostOutcome::PersistFailed {
            cause: e.to_string(),
        };
    }

    tracing::info!("Archived post {}: {}", post.id, post.title);
    PostOutcome::Archived {
        assets: summary.distinct_assets,
        asset_failures: summary.failed,
    }
}

/// Downgrades a dead worker to a `Crashed` outcome
fn join_outcome(joined: Result<PostOutcome, JoinError>) -> PostOutcome {
    match joined {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => PostOutcome::Crashed {
            cause: "worker panicked".to_string(),
        },
        Err(e) => PostOutcome::Crashed {
            cause: e.to_string(),
        },
    }
}

fn log_outcome(id: &PostId, outcome: &PostOutcome) {
    if outcome.is_error() {
        tracing::warn!("Post {}: {}", id, outcome);
    } else {
        tracing::debug!("Post {}: {}", id, outcome);
    }
}

/// Archives an identifier range with a new coordinator
pub async fn run_archive_range(config: Config, start: u64, end: u64) -> Result<RunReport, QuireError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.archive_range(start, end).await)
}

/// Archives a listing collection with a new coordinator
pub async fn run_archive_listing(
    config: Config,
    collection: &str,
    limit: usize,
) -> Result<RunReport, QuireError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.archive_listing(collection, limit).await
}
