//! Author enrichment from an online encyclopedia.
//!
//! [`PageLookup`] is the raw page source (Wikipedia in production, a scripted
//! mock in tests). [`AuthorResolver`] layers the intro/full/placeholder
//! fallback chain on top of it and is what the detail orchestrator talks to,
//! through the [`Encyclopedia`] trait.

mod resolver;
mod wikipedia;

pub use resolver::{AuthorResolver, NO_BIOGRAPHY};
pub use wikipedia::WikipediaClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Biography attached to a book detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorBio {
    pub summary: String,
    pub thumbnail_url: Option<String>,
    pub wiki_link: String,
}

/// How much of an article to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractScope {
    /// Lead section only.
    Intro,
    /// Article text, capped at the configured length.
    Full,
}

/// Result of a single page lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page exists and has a usable plain-text extract.
    Found {
        title: String,
        extract: String,
        thumbnail: Option<String>,
    },
    /// Page exists but the extract is empty.
    FoundNoExtract {
        title: String,
        thumbnail: Option<String>,
    },
    /// No page under that title.
    NoPage,
    /// Network, HTTP or decode failure.
    TransportError(String),
}

impl PageOutcome {
    /// Demote a `Found` with a blank extract to `FoundNoExtract`.
    pub fn normalize(self) -> Self {
        match self {
            PageOutcome::Found {
                title,
                extract,
                thumbnail,
            } if extract.trim().is_empty() => PageOutcome::FoundNoExtract { title, thumbnail },
            PageOutcome::Found {
                title,
                extract,
                thumbnail,
            } => PageOutcome::Found {
                title,
                extract: extract.trim().to_string(),
                thumbnail,
            },
            other => other,
        }
    }
}

/// Errors from the encyclopedia client itself.
#[derive(Debug, Error)]
pub enum EncyclopediaError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// A source of encyclopedia pages.
#[async_trait]
pub trait PageLookup: Send + Sync {
    /// Look up a page by title, following redirects.
    async fn lookup(&self, title: &str, scope: ExtractScope) -> PageOutcome;

    /// Human-facing article URL for a resolved title.
    fn article_url(&self, title: &str) -> String;
}

/// Author biography resolution, as seen by the detail orchestrator.
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Resolve a biography for `name`. Never fails; `None` means nothing
    /// usable was found or the source was unreachable.
    async fn resolve_author(&self, name: &str) -> Option<AuthorBio>;
}
