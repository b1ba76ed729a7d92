/// Per-post outcome definitions for archive runs
///
/// Every unit of work ends in exactly one of these outcomes. Errors raised
/// inside a unit are downgraded to an outcome at the unit boundary.
use std::fmt;

use crate::platform::PostId;

/// Final state of one post after an archive run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    // ===== Success =====
    /// Record written; `assets` images stored locally, `asset_failures` left remote
    Archived {
        assets: usize,
        asset_failures: usize,
    },

    // ===== Expected absence =====
    /// The platform reported the identifier as unused (HTTP 404)
    NotFound,

    /// Content was fetched but is not a real post (no title, protected, redirect)
    Skipped { reason: String },

    // ===== Errors =====
    /// Network or HTTP failure fetching the post page
    FetchFailed { cause: String },

    /// Writing the record or its assets failed
    PersistFailed { cause: String },

    /// The worker died unexpectedly (panic or cancelled task)
    Crashed { cause: String },
}

impl PostOutcome {
    /// Returns true if a record was written
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Archived { .. })
    }

    /// Returns true if the post was expected to be absent or unusable
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::NotFound | Self::Skipped { .. })
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed { .. } | Self::PersistFailed { .. } | Self::Crashed { .. }
        )
    }
}

impl fmt::Display for PostOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archived {
                assets,
                asset_failures,
            } => write!(
                f,
                "archived ({} assets, {} left remote)",
                assets, asset_failures
            ),
            Self::NotFound => write!(f, "not found"),
            Self::Skipped { reason } => write!(f, "skipped: {}", reason),
            Self::FetchFailed { cause } => write!(f, "fetch failed: {}", cause),
            Self::PersistFailed { cause } => write!(f, "persist failed: {}", cause),
            Self::Crashed { cause } => write!(f, "crashed: {}", cause),
        }
    }
}

/// Outcomes of one archive run, in submission order
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: Vec<(PostId, PostOutcome)>,
}

impl RunReport {
    pub fn record(&mut self, id: PostId, outcome: PostOutcome) {
        self.outcomes.push((id, outcome));
    }

    /// Number of posts whose record was written
    pub fn archived(&self) -> usize {
        self.count(PostOutcome::is_success)
    }

    pub fn skipped(&self) -> usize {
        self.count(PostOutcome::is_skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(PostOutcome::is_error)
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Looks up the outcome recorded for an identifier
    pub fn outcome_for(&self, id: &PostId) -> Option<&PostOutcome> {
        self.outcomes
            .iter()
            .find(|(recorded, _)| recorded == id)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, predicate: impl Fn(&PostOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .count()
    }
}
