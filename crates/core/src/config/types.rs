use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub encyclopedia: EncyclopediaConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Book catalog provider configuration (Google Books `volumes` API).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Provider API key. Optional: the volumes API works anonymously
    /// with a lower quota.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL (default: https://www.googleapis.com/books/v1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 8)
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u32,
    /// Language ranked first in search results.
    #[serde(default = "default_primary_language")]
    pub primary_language: String,
    /// Language ranked right after the primary one.
    #[serde(default = "default_secondary_language")]
    pub secondary_language: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_secs: default_catalog_timeout(),
            primary_language: default_primary_language(),
            secondary_language: default_secondary_language(),
        }
    }
}

fn default_catalog_timeout() -> u32 {
    8
}

fn default_primary_language() -> String {
    "cs".to_string()
}

fn default_secondary_language() -> String {
    "en".to_string()
}

/// Encyclopedia provider configuration (MediaWiki action API).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncyclopediaConfig {
    /// Wiki language edition, used for both the API host and article links.
    #[serde(default = "default_wiki_language")]
    pub language: String,
    /// API endpoint override (default: https://{language}.wikipedia.org/w/api.php).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// User-Agent sent with every request (Wikimedia asks for a contact).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds (default: 5)
    #[serde(default = "default_wiki_timeout")]
    pub timeout_secs: u32,
    /// Requested thumbnail width in pixels.
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
    /// Character cap for the full (non-intro) extract.
    #[serde(default = "default_max_extract_chars")]
    pub max_extract_chars: u32,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            language: default_wiki_language(),
            base_url: None,
            user_agent: default_user_agent(),
            timeout_secs: default_wiki_timeout(),
            thumbnail_size: default_thumbnail_size(),
            max_extract_chars: default_max_extract_chars(),
        }
    }
}

fn default_wiki_language() -> String {
    "cs".to_string()
}

fn default_user_agent() -> String {
    format!(
        "Readnook/{} ( https://github.com/readnook/readnook )",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_wiki_timeout() -> u32 {
    5
}

fn default_thumbnail_size() -> u32 {
    300
}

fn default_max_extract_chars() -> u32 {
    1200
}

/// Search result cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds (default: 300, at most 30 days)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Upper bound on cached queries.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Number of independently locked map shards, rounded up to a power of two.
    #[serde(default = "default_shards")]
    pub shards: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
            shards: default_shards(),
        }
    }
}

fn default_ttl() -> u64 {
    300
}

fn default_max_entries() -> usize {
    10_000
}

fn default_shards() -> usize {
    16
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: SanitizedCatalogConfig,
    pub encyclopedia: EncyclopediaConfig,
    pub cache: CacheConfig,
}

/// Sanitized catalog config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub primary_language: String,
    pub secondary_language: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                api_key_configured: config
                    .catalog
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
                timeout_secs: config.catalog.timeout_secs,
                primary_language: config.catalog.primary_language.clone(),
                secondary_language: config.catalog.secondary_language.clone(),
            },
            encyclopedia: config.encyclopedia.clone(),
            cache: config.cache.clone(),
        }
    }
}
