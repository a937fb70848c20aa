use std::sync::Arc;

use tracing::{debug, warn};

use super::BookError;
use crate::catalog::{BookCatalog, BookDetail};
use crate::encyclopedia::Encyclopedia;

/// Book detail with best-effort author enrichment.
pub struct DetailOrchestrator {
    catalog: Arc<dyn BookCatalog>,
    encyclopedia: Arc<dyn Encyclopedia>,
}

impl DetailOrchestrator {
    pub fn new(catalog: Arc<dyn BookCatalog>, encyclopedia: Arc<dyn Encyclopedia>) -> Self {
        Self {
            catalog,
            encyclopedia,
        }
    }

    /// Fetch one book and attach its primary author's biography.
    ///
    /// Catalog failures are returned; enrichment failures only leave
    /// `author_bio` as `None`.
    pub async fn detail(&self, id: &str) -> Result<BookDetail, BookError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(BookError::InvalidQuery("book id must not be empty".to_string()));
        }

        let mut detail = self.catalog.detail(id).await.map_err(|e| {
            warn!("Catalog detail for '{}' failed: {}", id, e);
            BookError::from(e)
        })?;

        let Some(author) = detail.primary_author().map(str::to_string) else {
            debug!("Book {} has no author, skipping enrichment", id);
            return Ok(detail);
        };

        detail.author_bio = self.encyclopedia.resolve_author(&author).await;
        if detail.author_bio.is_none() {
            debug!("No biography found for '{}' (book {})", author, id);
        }

        Ok(detail)
    }
}
