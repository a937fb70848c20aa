use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Coarse failure class, mapped to a status code by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller input failed validation.
    InvalidQuery,
    /// The requested catalog ID does not exist.
    NotFound,
    /// The catalog provider timed out or failed.
    UpstreamUnavailable,
}

/// Errors returned by the search and detail orchestrators.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Catalog unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl BookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookError::InvalidQuery(_) => ErrorKind::InvalidQuery,
            BookError::NotFound(_) => ErrorKind::NotFound,
            BookError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
        }
    }
}

impl From<CatalogError> for BookError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(what) => BookError::NotFound(what),
            other => BookError::UpstreamUnavailable(other.to_string()),
        }
    }
}
