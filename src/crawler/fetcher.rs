//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of an archive run:
//! - Building the shared HTTP client with a browser-like user agent
//! - GET requests for post pages, classified as found / not found / transient error
//! - GET requests for image assets, sent with the platform referer
//!
//! Every request is attempted exactly once. Failures are reported to the caller,
//! which records them; nothing here retries.

use crate::platform::{PlatformProfile, PostId};
use crate::QuireError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Browser user agent; both platforms reject obvious bot agents
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

/// Result of fetching a post page
#[derive(Debug)]
pub enum RawDocument {
    /// The page was served
    Found {
        /// Final URL after redirects
        url: String,
        /// Page body content
        body: String,
    },

    /// HTTP 404: the identifier is unused
    NotFound,

    /// Network error or non-2xx status other than 404
    TransientError {
        /// Error description
        cause: String,
    },
}

/// Bytes of a downloaded asset together with its declared type
#[derive(Debug)]
pub struct AssetPayload {
    pub bytes: Vec<u8>,
    /// Lowercased Content-Type header value, empty when absent
    pub content_type: String,
}

/// Builds the HTTP client shared by all workers of a run
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ko-KR,ko;q=0.9,en;q=0.8"));

    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the page of one post
pub async fn fetch_post(client: &Client, profile: &PlatformProfile, id: &PostId) -> RawDocument {
    fetch_document(client, &profile.post_url(id)).await
}

/// Fetches a page and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx | Found |
/// | HTTP 404 | NotFound |
/// | Other status | TransientError |
/// | Timeout / connect / body error | TransientError |
pub async fn fetch_document(client: &Client, url: &str) -> RawDocument {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return RawDocument::TransientError {
                cause: describe_transport_error(&e),
            }
        }
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return RawDocument::NotFound;
    }

    if !status.is_success() {
        return RawDocument::TransientError {
            cause: format!("HTTP {}", status.as_u16()),
        };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => RawDocument::Found {
            url: final_url,
            body,
        },
        Err(e) => RawDocument::TransientError {
            cause: describe_transport_error(&e),
        },
    }
}

/// Downloads one asset, sending the platform referer
pub async fn fetch_asset(
    client: &Client,
    url: &str,
    referer: &str,
) -> Result<AssetPayload, QuireError> {
    let response = client
        .get(url)
        .header(REFERER, referer)
        .send()
        .await
        .map_err(|source| QuireError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(QuireError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let bytes = response.bytes().await.map_err(|source| QuireError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(AssetPayload {
        bytes: bytes.to_vec(),
        content_type,
    })
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}
