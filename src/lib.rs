//! Quire: a blog post archiver
//!
//! This crate archives posts from a hosted blogging platform into local Markdown
//! records with locally stored images, and re-renders that archive into a single
//! WordPress eXtended RSS document for import elsewhere.

pub mod archive;
pub mod assets;
pub mod config;
pub mod crawler;
pub mod export;
pub mod platform;
pub mod state;

use thiserror::Error;

/// Main error type for Quire operations
#[derive(Debug, Error)]
pub enum QuireError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Persist error: {0}")]
    Persist(#[from] archive::PersistError),

    #[error("Malformed record {path}: {message}")]
    MalformedRecord { path: String, message: String },

    #[error("Listing parse error on page {page}: {message}")]
    Listing { page: u32, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Quire operations
pub type Result<T> = std::result::Result<T, QuireError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use platform::{PlatformKind, PlatformProfile, PostId};
pub use state::{PostOutcome, RunReport};
