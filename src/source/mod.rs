//! # Page Sources
//!
//! Where page text comes from. The router only knows page ids; a
//! `PageSource` turns an id into text.
//!
//! - [`HttpSource`]: `GET <base_url>/<page_id>`
//! - [`FileSource`]: reads `<root>/<page_id>` from disk

mod file;
mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileSource;
pub use http::HttpSource;

/// Errors that can occur while fetching a page.
///
/// None of these are fatal: the page just stays empty.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Reading from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Network-level failure (timeout, DNS, connection refused).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },
    /// The id can't name a page (empty, absolute, or escaping the root).
    #[error("invalid page id: {0:?}")]
    InvalidPageId(String),
}

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Short description for logs and the title bar.
    fn name(&self) -> &str;

    /// Fetch the raw text of a page.
    async fn fetch_text(&self, page_id: &str) -> Result<String, FetchError>;
}

/// Reject ids that are empty or that would leave the source's root.
pub(crate) fn check_page_id(page_id: &str) -> Result<(), FetchError> {
    let escapes = page_id.starts_with('/')
        || page_id.contains('\\')
        || page_id.split('/').any(|segment| segment == "..");
    if page_id.is_empty() || escapes {
        return Err(FetchError::InvalidPageId(page_id.to_string()));
    }
    Ok(())
}
