//! Configuration module for Quire
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a missing file yields a usable configuration.
//!
//! # Example
//!
//! ```no_run
//! use quire::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("quire.toml")).unwrap();
//! println!("Archiving with {} workers", config.archive.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ArchiveConfig, Config, ExportConfig, ListingConfig, PlatformConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
