//! Language-preference ordering of search results.
//!
//! Every book gets a tier: 0 for the primary locale, 1 for the secondary
//! locale, 2 for anything else. Results are stable-sorted on that tier alone,
//! so books within a tier keep the provider's relevance order.

use crate::config::CatalogConfig;

use super::BookSummary;

/// Tier for books in neither preferred language.
const OTHER_TIER: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingPolicy {
    primary: String,
    secondary: String,
}

impl RankingPolicy {
    pub fn new(primary: &str, secondary: &str) -> Self {
        Self {
            primary: primary_subtag(primary),
            secondary: primary_subtag(secondary),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.primary_language, &config.secondary_language)
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> &str {
        &self.secondary
    }

    /// Priority bucket for a language code; lower sorts first.
    pub fn tier(&self, language: &str) -> u8 {
        let language = primary_subtag(language);
        if language == self.primary {
            0
        } else if language == self.secondary {
            1
        } else {
            OTHER_TIER
        }
    }

    /// Stable-sort books by language tier.
    pub fn rank(&self, books: Vec<BookSummary>) -> Vec<BookSummary> {
        let mut tiered: Vec<(u8, BookSummary)> = books
            .into_iter()
            .map(|book| (self.tier(&book.language), book))
            .collect();
        // sort_by_key is stable
        tiered.sort_by_key(|(tier, _)| *tier);
        tiered.into_iter().map(|(_, book)| book).collect()
    }

    /// Rank, then keep the first `limit` books.
    pub fn rank_and_truncate(&self, books: Vec<BookSummary>, limit: usize) -> Vec<BookSummary> {
        let mut ranked = self.rank(books);
        ranked.truncate(limit);
        ranked
    }
}

/// "en-GB" -> "en", "CS" -> "cs".
fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}
