//! Book search and detail orchestration.
//!
//! [`SearchOrchestrator`] fronts the catalog with the TTL cache and applies
//! the language ranking. [`DetailOrchestrator`] fetches one book and enriches
//! it with the primary author's biography, never failing on enrichment.

mod detail;
mod error;
mod query;
mod search;

pub use detail::DetailOrchestrator;
pub use error::{BookError, ErrorKind};
pub use query::{SearchMode, SearchQuery, DEFAULT_LIMIT, MAX_FETCH, MAX_LIMIT, MIN_QUERY_CHARS};
pub use search::SearchOrchestrator;
