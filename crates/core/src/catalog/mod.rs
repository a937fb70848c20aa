//! Book catalog integration.
//!
//! This module provides the `BookCatalog` trait, the Google Books client
//! implementing it, the field normalization rules every backend follows and
//! the language ranking policy applied to search results.

mod google_books;
pub mod normalize;
mod ranking;
mod types;

pub use google_books::GoogleBooksClient;
pub use ranking::RankingPolicy;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::books::SearchQuery;

/// Errors that can occur when talking to the catalog provider.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The provider did not answer within the configured timeout.
    #[error("Catalog request timed out")]
    Timeout,

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client rejected by the provider (bad API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// Classify a transport error, keeping timeouts distinct.
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else {
            CatalogError::HttpError(e)
        }
    }
}

/// Trait for book catalog backends.
///
/// `search` returns normalized candidates in provider relevance order, at
/// most `query.fetch_size()` of them. Ranking and truncation to the
/// requested limit are applied by the caller.
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Search by exact title or author phrase.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<BookSummary>, CatalogError>;

    /// Fetch one book by provider ID. `author_bio` is always `None`.
    async fn detail(&self, id: &str) -> Result<BookDetail, CatalogError>;
}
