//! Mock encyclopedia page source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::encyclopedia::{ExtractScope, PageLookup, PageOutcome};

/// Mock implementation of the PageLookup trait.
///
/// Outcomes are scripted per `(title, scope)`; anything unscripted is
/// `NoPage`. Article URLs use a fixed `https://mock.wiki/` prefix.
#[derive(Debug)]
pub struct MockPageSource {
    outcomes: Arc<RwLock<HashMap<(String, ExtractScope), PageOutcome>>>,
    lookups: Arc<RwLock<Vec<(String, ExtractScope)>>>,
}

impl Default for MockPageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPageSource {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(RwLock::new(HashMap::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Script the outcome for one title and scope.
    pub async fn set_outcome(&self, title: &str, scope: ExtractScope, outcome: PageOutcome) {
        self.outcomes
            .write()
            .await
            .insert((title.to_string(), scope), outcome);
    }

    /// Script a plain intro hit.
    pub async fn set_intro(&self, title: &str, extract: &str, thumbnail: Option<&str>) {
        self.set_outcome(
            title,
            ExtractScope::Intro,
            PageOutcome::Found {
                title: title.to_string(),
                extract: extract.to_string(),
                thumbnail: thumbnail.map(String::from),
            },
        )
        .await;
    }

    /// Get all recorded lookups.
    pub async fn recorded_lookups(&self) -> Vec<(String, ExtractScope)> {
        self.lookups.read().await.clone()
    }

    /// Get the number of lookups performed.
    pub async fn lookup_count(&self) -> usize {
        self.lookups.read().await.len()
    }
}

#[async_trait]
impl PageLookup for MockPageSource {
    async fn lookup(&self, title: &str, scope: ExtractScope) -> PageOutcome {
        self.lookups.write().await.push((title.to_string(), scope));

        self.outcomes
            .read()
            .await
            .get(&(title.to_string(), scope))
            .cloned()
            .unwrap_or(PageOutcome::NoPage)
    }

    fn article_url(&self, title: &str) -> String {
        format!("https://mock.wiki/{}", title.replace(' ', "_"))
    }
}
