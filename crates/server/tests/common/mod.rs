//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock catalog and encyclopedia sources injected, so the full HTTP
//! stack can be exercised without network access.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use readnook_core::{
    testing::{MockCatalog, MockPageSource},
    AuthorResolver, Config, DetailOrchestrator, RankingPolicy, SearchOrchestrator, TtlCache,
};

/// Re-export fixtures for test convenience
pub use readnook_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.catalog.add_book(fixtures::book_summary("b1", "Dune", "Frank Herbert", "en")).await;
///
///     let response = fixture.get("/api/v1/books/search?query=dune").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure books and inject failures
    pub catalog: Arc<MockCatalog>,
    /// Author resolver over a scripted page source
    pub encyclopedia: Arc<AuthorResolver<MockPageSource>>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default configuration.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let catalog = Arc::new(MockCatalog::new());
        let encyclopedia = Arc::new(AuthorResolver::new(MockPageSource::new()));

        let mut config = Config::default();
        config.catalog.api_key = Some("test-secret-key".to_string());
        config.cache.ttl_secs = test_config.cache_ttl.as_secs();

        let cache = Arc::new(TtlCache::new(test_config.cache_ttl, 1000, 4));
        let search = SearchOrchestrator::new(
            Arc::clone(&catalog) as Arc<dyn readnook_core::BookCatalog>,
            cache,
            RankingPolicy::from_config(&config.catalog),
        );
        let details = DetailOrchestrator::new(
            Arc::clone(&catalog) as Arc<dyn readnook_core::BookCatalog>,
            Arc::clone(&encyclopedia) as Arc<dyn readnook_core::Encyclopedia>,
        );

        let state = Arc::new(readnook_server::state::AppState::new(
            config, search, details,
        ));
        let router = readnook_server::api::create_router(state);

        Self {
            router,
            catalog,
            encyclopedia,
        }
    }

    /// Scripted page source behind the resolver.
    pub fn pages(&self) -> &MockPageSource {
        self.encyclopedia.source()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Search cache TTL
    pub cache_ttl: Duration,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
