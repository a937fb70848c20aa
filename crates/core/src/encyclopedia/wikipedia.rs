//! Wikipedia (MediaWiki action API) page source.
//!
//! One `action=query` request per lookup returns both the plain-text extract
//! and the page thumbnail. Redirects are followed server-side, so "Čapek"
//! style short names resolve to the canonical article.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{EncyclopediaError, ExtractScope, PageLookup, PageOutcome};
use crate::config::EncyclopediaConfig;
use crate::metrics::observe_external_call;

/// Wikipedia client bound to one language edition.
pub struct WikipediaClient {
    client: Client,
    api_url: String,
    language: String,
    thumbnail_size: String,
    max_extract_chars: String,
}

impl WikipediaClient {
    pub fn new(config: &EncyclopediaConfig) -> Result<Self, EncyclopediaError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let language = config.language.trim().to_lowercase();
        let api_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.wikipedia.org/w/api.php", language));

        Ok(Self {
            client,
            api_url,
            language,
            thumbnail_size: config.thumbnail_size.to_string(),
            max_extract_chars: config.max_extract_chars.to_string(),
        })
    }

    async fn fetch(&self, title: &str, scope: ExtractScope) -> Result<PageOutcome, EncyclopediaError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("prop", "extracts|pageimages"),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("piprop", "thumbnail"),
            ("pithumbsize", &self.thumbnail_size),
            ("titles", title),
        ];
        match scope {
            ExtractScope::Intro => params.push(("exintro", "1")),
            ExtractScope::Full => params.push(("exchars", &self.max_extract_chars)),
        }

        debug!("Wikipedia lookup: title='{}', scope={:?}", title, scope);

        let response = self.client.get(&self.api_url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EncyclopediaError::ApiError(format!("HTTP {}", status.as_u16())));
        }

        let body: MwResponse = response
            .json()
            .await
            .map_err(|e| EncyclopediaError::ParseError(e.to_string()))?;

        classify(body)
    }
}

#[async_trait]
impl PageLookup for WikipediaClient {
    async fn lookup(&self, title: &str, scope: ExtractScope) -> PageOutcome {
        let operation = match scope {
            ExtractScope::Intro => "intro",
            ExtractScope::Full => "full",
        };

        let start = Instant::now();
        let result = self.fetch(title, scope).await;
        observe_external_call(
            "wikipedia",
            operation,
            result.is_ok(),
            start.elapsed().as_secs_f64(),
        );

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Wikipedia lookup for '{}' failed: {}", title, e);
                PageOutcome::TransportError(e.to_string())
            }
        }
    }

    fn article_url(&self, title: &str) -> String {
        format!(
            "https://{}.wikipedia.org/wiki/{}",
            self.language,
            urlencoding::encode(&title.replace(' ', "_"))
        )
    }
}

/// Turn a decoded response into a page outcome.
fn classify(body: MwResponse) -> Result<PageOutcome, EncyclopediaError> {
    if let Some(error) = body.error {
        return Err(EncyclopediaError::ApiError(format!(
            "{}: {}",
            error.code, error.info
        )));
    }

    let page = match body.query.and_then(|q| q.pages.into_iter().next()) {
        Some(page) if page.exists() => page,
        _ => return Ok(PageOutcome::NoPage),
    };

    let thumbnail = page.thumbnail.map(|t| t.source);
    let outcome = match page.extract {
        Some(extract) => PageOutcome::Found {
            title: page.title,
            extract,
            thumbnail,
        },
        None => PageOutcome::FoundNoExtract {
            title: page.title,
            thumbnail,
        },
    };
    Ok(outcome.normalize())
}

// =============================================================================
// MediaWiki API response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct MwResponse {
    query: Option<MwQuery>,
    error: Option<MwError>,
}

#[derive(Debug, Deserialize)]
struct MwQuery {
    #[serde(default)]
    pages: Vec<MwPage>,
}

#[derive(Debug, Deserialize)]
struct MwPage {
    pageid: Option<i64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
    thumbnail: Option<MwThumbnail>,
}

impl MwPage {
    fn exists(&self) -> bool {
        !self.missing && !self.invalid && self.pageid.map_or(true, |id| id > 0)
    }
}

#[derive(Debug, Deserialize)]
struct MwThumbnail {
    source: String,
}

#[derive(Debug, Deserialize)]
struct MwError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stub_http::{StubResponse, StubServer};

    fn parse(json: &str) -> Result<PageOutcome, EncyclopediaError> {
        classify(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_classify_found() {
        let outcome = parse(
            r#"{
                "batchcomplete": true,
                "query": {
                    "redirects": [{"from": "Čapek", "to": "Karel Čapek"}],
                    "pages": [{
                        "pageid": 2361,
                        "ns": 0,
                        "title": "Karel Čapek",
                        "extract": "Karel Čapek byl český spisovatel.",
                        "thumbnail": {"source": "https://upload.wikimedia.org/capek.jpg", "width": 300, "height": 400}
                    }]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            outcome,
            PageOutcome::Found {
                title: "Karel Čapek".to_string(),
                extract: "Karel Čapek byl český spisovatel.".to_string(),
                thumbnail: Some("https://upload.wikimedia.org/capek.jpg".to_string()),
            }
        );
    }

    #[test]
    fn test_classify_missing_page() {
        let outcome = parse(
            r#"{"query": {"pages": [{"ns": 0, "title": "Xyzzy Author", "missing": true}]}}"#,
        )
        .unwrap();
        assert_eq!(outcome, PageOutcome::NoPage);
    }

    #[test]
    fn test_classify_invalid_and_empty() {
        let invalid = parse(
            r#"{"query": {"pages": [{"title": "", "invalidreason": "bad title", "invalid": true}]}}"#,
        )
        .unwrap();
        assert_eq!(invalid, PageOutcome::NoPage);

        assert_eq!(parse(r#"{"query": {"pages": []}}"#).unwrap(), PageOutcome::NoPage);
        assert_eq!(
            parse(r#"{"query": {"pages": [{"pageid": -1, "title": "Ghost"}]}}"#).unwrap(),
            PageOutcome::NoPage
        );
        assert_eq!(parse(r#"{"batchcomplete": true}"#).unwrap(), PageOutcome::NoPage);
    }

    #[test]
    fn test_classify_page_without_extract() {
        let outcome = parse(
            r#"{"query": {"pages": [{
                "pageid": 1, "ns": 0, "title": "Author",
                "extract": "",
                "thumbnail": {"source": "https://img/a.jpg"}
            }]}}"#,
        )
        .unwrap();
        assert_eq!(
            outcome,
            PageOutcome::FoundNoExtract {
                title: "Author".to_string(),
                thumbnail: Some("https://img/a.jpg".to_string()),
            }
        );

        let absent = parse(r#"{"query": {"pages": [{"pageid": 1, "title": "Author"}]}}"#).unwrap();
        assert_eq!(
            absent,
            PageOutcome::FoundNoExtract {
                title: "Author".to_string(),
                thumbnail: None,
            }
        );
    }

    #[test]
    fn test_classify_api_error() {
        let err = parse(r#"{"error": {"code": "badvalue", "info": "Unrecognized value"}}"#)
            .unwrap_err();
        assert!(matches!(err, EncyclopediaError::ApiError(ref m) if m.contains("badvalue")));
    }

    #[test]
    fn test_article_url() {
        let client = WikipediaClient::new(&EncyclopediaConfig::default()).unwrap();
        assert_eq!(
            client.article_url("Karel Čapek"),
            "https://cs.wikipedia.org/wiki/Karel_%C4%8Capek"
        );
    }

    #[test]
    fn test_article_url_follows_language() {
        let config = EncyclopediaConfig {
            language: "EN".to_string(),
            ..Default::default()
        };
        let client = WikipediaClient::new(&config).unwrap();
        assert_eq!(
            client.article_url("Frank Herbert"),
            "https://en.wikipedia.org/wiki/Frank_Herbert"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = EncyclopediaConfig {
            base_url: Some("http://127.0.0.1:9/w/api.php".to_string()),
            timeout_secs: 1,
            ..Default::default()
        };
        let client = WikipediaClient::new(&config).unwrap();

        let outcome = client.lookup("Anyone", ExtractScope::Intro).await;
        assert!(matches!(outcome, PageOutcome::TransportError(_)));
    }

    const CAPEK_JSON: &str = r#"{"query": {"pages": [{
        "pageid": 2361, "title": "Karel Čapek",
        "extract": "Karel Čapek byl český spisovatel.",
        "thumbnail": {"source": "https://upload.wikimedia.org/capek.jpg"}
    }]}}"#;

    fn stub_client(server: &StubServer) -> WikipediaClient {
        let config = EncyclopediaConfig {
            base_url: Some(format!("{}/w/api.php", server.base_url())),
            timeout_secs: 1,
            thumbnail_size: 240,
            max_extract_chars: 900,
            ..Default::default()
        };
        WikipediaClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_intro_lookup_request() {
        let server = StubServer::start(StubResponse::json(200, CAPEK_JSON)).await;
        let client = stub_client(&server);

        let outcome = client.lookup("Karel Čapek", ExtractScope::Intro).await;
        assert!(matches!(outcome, PageOutcome::Found { ref title, .. } if title == "Karel Čapek"));

        assert!(server.targets().await[0].starts_with("/w/api.php?"));
        let query = server.single_query().await;
        assert_eq!(query["action"], "query");
        assert_eq!(query["formatversion"], "2");
        assert_eq!(query["prop"], "extracts|pageimages");
        assert_eq!(query["explaintext"], "1");
        assert_eq!(query["redirects"], "1");
        assert_eq!(query["pithumbsize"], "240");
        assert_eq!(query["titles"], "Karel Čapek");
        assert_eq!(query["exintro"], "1");
        assert!(!query.contains_key("exchars"));
    }

    #[tokio::test]
    async fn test_full_lookup_request() {
        let server = StubServer::start(StubResponse::json(200, CAPEK_JSON)).await;
        let client = stub_client(&server);

        client.lookup("Karel Čapek", ExtractScope::Full).await;

        let query = server.single_query().await;
        assert_eq!(query["exchars"], "900");
        assert!(!query.contains_key("exintro"));
    }

    #[tokio::test]
    async fn test_missing_page_response_is_no_page() {
        let server = StubServer::start(StubResponse::json(
            200,
            r#"{"query": {"pages": [{"ns": 0, "title": "Nobody", "missing": true}]}}"#,
        ))
        .await;
        let client = stub_client(&server);

        assert_eq!(client.lookup("Nobody", ExtractScope::Intro).await, PageOutcome::NoPage);
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let server = StubServer::start(StubResponse::json(503, "{}")).await;
        let client = stub_client(&server);

        let outcome = client.lookup("Karel Čapek", ExtractScope::Intro).await;
        assert!(matches!(outcome, PageOutcome::TransportError(ref m) if m.contains("503")));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_transport_error() {
        let server = StubServer::start(StubResponse::json(200, "<html>oops</html>")).await;
        let client = stub_client(&server);

        let outcome = client.lookup("Karel Čapek", ExtractScope::Intro).await;
        assert!(matches!(outcome, PageOutcome::TransportError(_)));
    }

    #[tokio::test]
    async fn test_slow_response_is_transport_error() {
        let server = StubServer::start(
            StubResponse::json(200, CAPEK_JSON).delayed(std::time::Duration::from_secs(3)),
        )
        .await;
        let client = stub_client(&server);

        let outcome = client.lookup("Karel Čapek", ExtractScope::Intro).await;
        assert!(matches!(outcome, PageOutcome::TransportError(_)));
    }
}
