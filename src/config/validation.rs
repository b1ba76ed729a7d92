use crate::config::types::{ArchiveConfig, Config, ExportConfig, ListingConfig, PlatformConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_platform_config(&config.platform)?;
    validate_archive_config(&config.archive)?;
    validate_listing_config(&config.listing)?;
    validate_export_config(&config.export)?;
    Ok(())
}

/// Validates platform configuration
fn validate_platform_config(config: &PlatformConfig) -> Result<(), ConfigError> {
    if config.blog_id.is_empty() {
        return Err(ConfigError::Validation("blog_id cannot be empty".to_string()));
    }

    // The blog id lands in a hostname or a query string
    if !config
        .blog_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "blog_id must contain only ASCII alphanumerics, '-' or '_', got '{}'",
            config.blog_id
        )));
    }

    if let Some(base_url) = &config.base_url {
        validate_http_url("platform base_url", base_url)?;
    }

    Ok(())
}

/// Validates archive run configuration
fn validate_archive_config(config: &ArchiveConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    validate_path_segment("images_root", &config.images_root)?;

    Ok(())
}

/// Validates listing configuration
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates export configuration
fn validate_export_config(config: &ExportConfig) -> Result<(), ConfigError> {
    validate_http_url("export base_url", &config.base_url)?;
    validate_http_url("export site_link", &config.site_link)?;

    if config.output_file.is_empty() {
        return Err(ConfigError::Validation(
            "output_file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}

/// A single directory name: no separators, no dot segments
fn validate_path_segment(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "{} must be a single directory name, got '{}'",
            field, value
        )));
    }
    Ok(())
}
