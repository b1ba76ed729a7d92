//! State module for tracking archive run progress
//!
//! # Components
//!
//! - `PostOutcome`: the final state of one post (archived, not found, skipped, failed)
//! - `RunReport`: all outcomes of a run plus summary counts

mod outcome;

// Re-export main types
pub use outcome::{PostOutcome, RunReport};
