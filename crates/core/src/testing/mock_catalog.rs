//! Mock book catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::books::{SearchMode, SearchQuery};
use crate::catalog::{BookCatalog, BookDetail, BookSummary, CatalogError};

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogCall {
    Search {
        text: String,
        mode: SearchMode,
        fetch_size: u32,
    },
    Detail {
        id: String,
    },
}

/// Mock implementation of the BookCatalog trait.
///
/// Search results come back in insertion order, which stands in for the
/// provider's relevance order.
///
/// # Example
///
/// ```rust,ignore
/// use readnook_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.add_book(fixtures::book_summary("b1", "Dune", "Frank Herbert", "en")).await;
///
/// let query = SearchQuery::new("dune", SearchMode::Title, None)?;
/// let results = catalog.search(&query).await?;
/// assert_eq!(results.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockCatalog {
    /// Searchable books, in relevance order.
    books: Arc<RwLock<Vec<BookSummary>>>,
    /// Detail records by ID.
    details: Arc<RwLock<HashMap<String, BookDetail>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedCatalogCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// Artificial latency applied to every call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            books: Arc::new(RwLock::new(Vec::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Append a searchable book.
    pub async fn add_book(&self, book: BookSummary) {
        self.books.write().await.push(book);
    }

    /// Replace all searchable books.
    pub async fn set_books(&self, books: Vec<BookSummary>) {
        *self.books.write().await = books;
    }

    /// Add a detail record.
    pub async fn add_detail(&self, detail: BookDetail) {
        self.details
            .write()
            .await
            .insert(detail.summary.id.clone(), detail);
    }

    /// Delay every call by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    // =========================================================================
    // Call Recording
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCatalogCall> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls performed.
    pub async fn query_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Get the number of search calls performed.
    pub async fn search_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedCatalogCall::Search { .. }))
            .count()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, call: RecordedCatalogCall) {
        self.calls.write().await.push(call);
    }

    async fn wait(&self) {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl BookCatalog for MockCatalog {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<BookSummary>, CatalogError> {
        self.record(RecordedCatalogCall::Search {
            text: query.text().to_string(),
            mode: query.mode(),
            fetch_size: query.fetch_size(),
        })
        .await;
        self.wait().await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let needle = query.text().to_lowercase();
        let books = self.books.read().await;
        let results = books
            .iter()
            .filter(|b| {
                let haystack = match query.mode() {
                    SearchMode::Title => &b.title,
                    SearchMode::Author => &b.author,
                };
                haystack.to_lowercase().contains(&needle)
            })
            .take(query.fetch_size() as usize)
            .cloned()
            .collect();

        Ok(results)
    }

    async fn detail(&self, id: &str) -> Result<BookDetail, CatalogError> {
        self.record(RecordedCatalogCall::Detail { id: id.to_string() })
            .await;
        self.wait().await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.details
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Volume {} not found", id)))
    }
}
