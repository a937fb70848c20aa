use std::sync::Arc;

use tracing::{debug, warn};

use super::{BookError, SearchMode, SearchQuery};
use crate::cache::TtlCache;
use crate::catalog::{BookCatalog, BookSummary, RankingPolicy};

/// Cache-fronted book search.
///
/// `Validate -> CacheLookup -> (hit: return) | (miss: fetch -> rank -> store -> return)`.
pub struct SearchOrchestrator {
    catalog: Arc<dyn BookCatalog>,
    cache: Arc<TtlCache<Vec<BookSummary>>>,
    ranking: RankingPolicy,
}

impl SearchOrchestrator {
    pub fn new(
        catalog: Arc<dyn BookCatalog>,
        cache: Arc<TtlCache<Vec<BookSummary>>>,
        ranking: RankingPolicy,
    ) -> Self {
        Self {
            catalog,
            cache,
            ranking,
        }
    }

    pub fn cache(&self) -> &Arc<TtlCache<Vec<BookSummary>>> {
        &self.cache
    }

    /// Validate raw input and search.
    pub async fn search(
        &self,
        text: &str,
        mode: SearchMode,
        limit: Option<u32>,
    ) -> Result<Vec<BookSummary>, BookError> {
        let query = SearchQuery::new(text, mode, limit)?;
        self.search_query(&query).await
    }

    /// Search with an already validated query.
    pub async fn search_query(&self, query: &SearchQuery) -> Result<Vec<BookSummary>, BookError> {
        let key = query.cache_key();

        if let Some(books) = self.cache.get(&key) {
            debug!("Search cache hit: {}", key);
            return Ok(books);
        }
        debug!("Search cache miss: {}", key);

        let candidates = match self.catalog.search(query).await {
            Ok(books) => books,
            Err(e) => {
                warn!("Catalog search for '{}' failed: {}", query.text(), e);
                return Err(e.into());
            }
        };

        let books = self
            .ranking
            .rank_and_truncate(candidates, query.limit() as usize);
        self.cache.set(key, books.clone());
        Ok(books)
    }
}
