//! Google Books API client.
//!
//! Works without an API key at a reduced quota. Search uses the `intitle:`
//! and `inauthor:` operators with a quoted phrase.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use super::normalize::{self, NOT_AVAILABLE, UNCATEGORIZED, UNKNOWN_PUBLISHER, UNKNOWN_TITLE};
use super::{BookCatalog, BookDetail, BookSummary, CatalogError};
use crate::books::{SearchMode, SearchQuery};
use crate::config::CatalogConfig;
use crate::metrics::observe_external_call;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const SERVICE: &str = "google_books";

/// Google Books API client.
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    /// Create a new Google Books client.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    /// Provider query for a search: a quoted phrase behind the mode operator.
    pub(crate) fn query_string(query: &SearchQuery) -> String {
        let phrase = query.text().replace('\\', "\\\\").replace('"', "\\\"");
        let operator = match query.mode() {
            SearchMode::Title => "intitle",
            SearchMode::Author => "inauthor",
        };
        format!("{}:\"{}\"", operator, phrase)
    }

    /// Map a non-success status to a catalog error.
    ///
    /// A 404 means a missing volume only when `missing` names one; on the
    /// search endpoint it is a provider fault like any other status.
    async fn check_status(
        response: Response,
        missing: Option<&str>,
    ) -> Result<Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if let (404, Some(what)) = (status.as_u16(), missing) {
            return Err(CatalogError::NotFound(what.to_string()));
        }
        if status == 401 || status == 403 {
            return Err(CatalogError::NotConfigured(
                "Google Books rejected the API key".to_string(),
            ));
        }
        if status == 429 {
            warn!("Google Books rate limit exceeded");
            return Err(CatalogError::RateLimitExceeded);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CatalogError::ApiError {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        })
    }

    async fn fetch_search(&self, query: &SearchQuery) -> Result<Vec<BookSummary>, CatalogError> {
        let url = format!("{}/volumes", self.base_url);
        let q = Self::query_string(query);
        let max_results = query.fetch_size().to_string();

        debug!(q = %q, max_results = %max_results, "Google Books search");

        let mut request = self.client.get(&url).query(&[
            ("q", q.as_str()),
            ("maxResults", max_results.as_str()),
            ("printType", "books"),
        ]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await.map_err(CatalogError::from_transport)?;
        let response = Self::check_status(response, None).await?;

        let search_result: GbSearchResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse volume search response: {}", e))
        })?;

        Ok(search_result
            .items
            .into_iter()
            .take(query.fetch_size() as usize)
            .map(BookSummary::from)
            .collect())
    }

    async fn fetch_detail(&self, id: &str) -> Result<BookDetail, CatalogError> {
        let url = format!("{}/volumes/{}", self.base_url, urlencoding::encode(id));

        debug!(id = id, "Google Books get volume");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await.map_err(CatalogError::from_transport)?;
        let missing = format!("Volume {}", id);
        let response = Self::check_status(response, Some(&missing)).await?;

        let volume: GbVolume = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse volume response: {}", e))
        })?;

        Ok(volume.into())
    }
}

#[async_trait]
impl BookCatalog for GoogleBooksClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<BookSummary>, CatalogError> {
        let started = Instant::now();
        let result = self.fetch_search(query).await;
        observe_external_call(
            SERVICE,
            "search",
            result.is_ok(),
            started.elapsed().as_secs_f64(),
        );
        result
    }

    async fn detail(&self, id: &str) -> Result<BookDetail, CatalogError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::NotFound("empty volume id".to_string()));
        }

        let started = Instant::now();
        let result = self.fetch_detail(id).await;
        observe_external_call(
            SERVICE,
            "detail",
            result.is_ok(),
            started.elapsed().as_secs_f64(),
        );
        result
    }
}

// ============================================================================
// Google Books API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct GbSearchResponse {
    #[serde(default)]
    items: Vec<GbVolume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GbVolume {
    id: String,
    #[serde(default)]
    volume_info: GbVolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GbVolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<GbIdentifier>,
    page_count: Option<u32>,
    #[serde(default)]
    categories: Vec<String>,
    image_links: Option<GbImageLinks>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GbIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GbImageLinks {
    small_thumbnail: Option<String>,
    thumbnail: Option<String>,
}

// ============================================================================
// Conversions
// ============================================================================

impl GbVolumeInfo {
    fn isbn13(&self) -> String {
        self.industry_identifiers
            .iter()
            .find(|i| i.kind == "ISBN_13")
            .map(|i| i.identifier.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    fn thumbnail(&self) -> Option<String> {
        self.image_links
            .as_ref()
            .and_then(|links| links.thumbnail.clone().or(links.small_thumbnail.clone()))
    }

    /// Description with markup removed, if any text remains.
    fn plain_description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(normalize::strip_html)
            .filter(|d| !d.is_empty())
    }
}

impl From<GbVolume> for BookSummary {
    fn from(volume: GbVolume) -> Self {
        let info = volume.volume_info;
        let short_description = match info.plain_description() {
            Some(text) => normalize::truncate_description(&text),
            None => normalize::NO_DESCRIPTION.to_string(),
        };

        Self {
            id: volume.id,
            author: normalize::author_line(&info.authors),
            short_description,
            cover_url: normalize::cover_url(info.thumbnail()),
            isbn13: info.isbn13(),
            published_year: normalize::published_year(info.published_date.as_deref()),
            page_count: normalize::page_count(info.page_count),
            title: normalize::or_placeholder(info.title, UNKNOWN_TITLE),
            language: normalize::language(info.language),
        }
    }
}

impl From<GbVolume> for BookDetail {
    fn from(volume: GbVolume) -> Self {
        let description = volume
            .volume_info
            .plain_description()
            .unwrap_or_else(|| normalize::NO_DESCRIPTION.to_string());
        let authors: Vec<String> = volume
            .volume_info
            .authors
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        let publisher = volume.volume_info.publisher.clone();
        let mut genres: Vec<String> = volume
            .volume_info
            .categories
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if genres.is_empty() {
            genres.push(UNCATEGORIZED.to_string());
        }

        Self {
            summary: volume.into(),
            authors,
            description,
            publisher: normalize::or_placeholder(publisher, UNKNOWN_PUBLISHER),
            genres,
            author_bio: None,
        }
    }
}
