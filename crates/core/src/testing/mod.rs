//! Testing utilities and mock implementations.
//!
//! Mocks for the catalog and the encyclopedia page source, so the
//! orchestrators and the HTTP layer can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use readnook_core::testing::{MockCatalog, MockPageSource, fixtures};
//!
//! let catalog = MockCatalog::new();
//! catalog.add_book(fixtures::book_summary("b1", "Válka s mloky", "Karel Čapek", "cs")).await;
//!
//! let pages = MockPageSource::new();
//! pages.set_intro("Karel Čapek", "Czech writer.", None).await;
//! ```

mod mock_catalog;
mod mock_page_source;
#[cfg(test)]
pub(crate) mod stub_http;

pub use mock_catalog::{MockCatalog, RecordedCatalogCall};
pub use mock_page_source::MockPageSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{BookDetail, BookSummary};
    use crate::encyclopedia::AuthorBio;

    /// Create a normalized book summary with reasonable defaults.
    pub fn book_summary(id: &str, title: &str, author: &str, language: &str) -> BookSummary {
        BookSummary {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            short_description: format!("A book called {}.", title),
            cover_url: format!("https://books.example/{}/cover.jpg", id),
            isbn13: "9780000000000".to_string(),
            published_year: "1999".to_string(),
            page_count: "320".to_string(),
            language: language.to_string(),
        }
    }

    /// Create a book detail with no biography attached.
    pub fn book_detail(id: &str, title: &str, authors: &[&str]) -> BookDetail {
        let author = if authors.is_empty() {
            crate::catalog::normalize::UNKNOWN_AUTHOR.to_string()
        } else {
            authors.join(", ")
        };

        BookDetail {
            summary: book_summary(id, title, &author, "en"),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            description: format!("The full story of {}.", title),
            publisher: "Example Press".to_string(),
            genres: vec!["Fiction".to_string()],
            author_bio: None,
        }
    }

    /// Create an author biography.
    pub fn author_bio(name: &str) -> AuthorBio {
        AuthorBio {
            summary: format!("{} is a writer.", name),
            thumbnail_url: Some(format!("https://img.example/{}.jpg", name.replace(' ', "_"))),
            wiki_link: format!("https://mock.wiki/{}", name.replace(' ', "_")),
        }
    }
}
