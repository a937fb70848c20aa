//! Validated search input.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::BookError;

/// Minimum number of characters in a trimmed query.
pub const MIN_QUERY_CHARS: usize = 3;
/// Results per page when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest accepted limit.
pub const MAX_LIMIT: u32 = 30;
/// Upper bound on candidates requested from the provider.
pub const MAX_FETCH: u32 = 30;

/// Which field the search phrase must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Title,
    Author,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Title => "title",
            SearchMode::Author => "author",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search request that has passed validation.
///
/// Only [`SearchQuery::new`] builds one, so holding a `SearchQuery` means the
/// text is long enough and the limit is in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    mode: SearchMode,
    limit: u32,
}

impl SearchQuery {
    /// Validate and normalize raw input.
    ///
    /// The text is trimmed and inner whitespace runs collapse to one space.
    /// `limit` defaults to [`DEFAULT_LIMIT`] and must lie in `1..=MAX_LIMIT`.
    pub fn new(text: &str, mode: SearchMode, limit: Option<u32>) -> Result<Self, BookError> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.chars().count() < MIN_QUERY_CHARS {
            return Err(BookError::InvalidQuery(format!(
                "query must be at least {} characters",
                MIN_QUERY_CHARS
            )));
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(BookError::InvalidQuery(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            )));
        }

        Ok(Self { text, mode, limit })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of candidates to request upstream, leaving headroom for ranking.
    pub fn fetch_size(&self) -> u32 {
        (self.limit * 2).min(MAX_FETCH)
    }

    /// Cache key: mode, limit and case-folded text.
    pub fn cache_key(&self) -> String {
        format!("{}:{}:{}", self.mode, self.limit, self.text.to_lowercase())
    }
}
