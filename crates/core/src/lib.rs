pub mod books;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod encyclopedia;
pub mod metrics;
pub mod testing;

pub use books::{BookError, DetailOrchestrator, ErrorKind, SearchMode, SearchOrchestrator, SearchQuery};
pub use cache::{CacheStats, TtlCache};
pub use catalog::{BookCatalog, BookDetail, BookSummary, CatalogError, GoogleBooksClient, RankingPolicy};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use encyclopedia::{AuthorBio, AuthorResolver, Encyclopedia, PageLookup, WikipediaClient};
