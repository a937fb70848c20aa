//! Normalized book records handed out by catalog clients.
//!
//! Every field is present and non-null: missing provider data is replaced
//! by the placeholders in [`super::normalize`].

use serde::{Deserialize, Serialize};

use crate::encyclopedia::AuthorBio;

/// A search result row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    /// Provider volume ID.
    pub id: String,
    pub title: String,
    /// Author names joined with ", ".
    pub author: String,
    /// At most 200 characters, followed by "..." when cut.
    pub short_description: String,
    pub cover_url: String,
    /// ISBN-13 or "N/A".
    pub isbn13: String,
    pub published_year: String,
    /// Page count in decimal or "N/A".
    pub page_count: String,
    /// Lowercase language code as reported by the provider.
    pub language: String,
}

/// Full book record for the detail view.
///
/// Serializes flat: summary fields sit next to the detail fields, and the
/// author biography is emitted as `authorDetails`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    #[serde(flatten)]
    pub summary: BookSummary,
    /// Individual author names in provider order.
    pub authors: Vec<String>,
    /// Full description with markup removed.
    pub description: String,
    pub publisher: String,
    /// Provider categories, or a single placeholder entry.
    pub genres: Vec<String>,
    /// Biography of the primary author. `None` once enrichment has run
    /// means nothing usable was found.
    #[serde(rename = "authorDetails")]
    pub author_bio: Option<AuthorBio>,
}

impl BookDetail {
    /// First listed author, used for enrichment.
    pub fn primary_author(&self) -> Option<&str> {
        self.authors
            .first()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }
}
