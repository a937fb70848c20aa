//! Book search and detail handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use readnook_core::{BookDetail, BookError, BookSummary, SearchMode, SearchQuery};
use serde::Deserialize;

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request types
// ============================================================================

/// Raw query parameters. Parsed by hand so bad values still produce a JSON
/// error body instead of the extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl SearchParams {
    fn into_query(self) -> Result<SearchQuery, BookError> {
        let mode = match self.mode.as_deref().map(str::trim) {
            None | Some("") | Some("title") => SearchMode::Title,
            Some("author") => SearchMode::Author,
            Some(other) => {
                return Err(BookError::InvalidQuery(format!(
                    "mode must be 'title' or 'author', got '{}'",
                    other
                )))
            }
        };

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                BookError::InvalidQuery(format!("limit must be a positive integer, got '{}'", raw))
            })?),
        };

        SearchQuery::new(&self.query, mode, limit)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/books/search
///
/// Search books by title or author.
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<BookSummary>>, ApiError> {
    let query = params.into_query()?;
    let books = state.search().search_query(&query).await?;
    Ok(Json(books))
}

/// GET /api/v1/books/{id}
///
/// Book detail with the primary author's biography.
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookDetail>, ApiError> {
    let detail = state.details().detail(&id).await?;
    Ok(Json(detail))
}
