use async_trait::async_trait;
use tracing::debug;

use super::{AuthorBio, Encyclopedia, ExtractScope, PageLookup, PageOutcome};
use crate::metrics::AUTHOR_ENRICHMENT;

/// Summary used when a page exists but yields no text.
pub const NO_BIOGRAPHY: &str = "No biography available.";

/// Runs the intro -> full -> placeholder fallback chain over a page source.
pub struct AuthorResolver<S> {
    source: S,
}

impl<S: PageLookup> AuthorResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn bio(&self, title: &str, summary: String, thumbnail: Option<String>) -> AuthorBio {
        AuthorBio {
            summary,
            thumbnail_url: thumbnail,
            wiki_link: self.source.article_url(title),
        }
    }

    async fn resolve(&self, name: &str) -> (&'static str, Option<AuthorBio>) {
        // Remembered from step 1 when the page exists without an extract.
        let (first_title, first_thumbnail) =
            match self.source.lookup(name, ExtractScope::Intro).await.normalize() {
                PageOutcome::Found {
                    title,
                    extract,
                    thumbnail,
                } => return ("intro", Some(self.bio(&title, extract, thumbnail))),
                PageOutcome::FoundNoExtract { title, thumbnail } => (Some(title), thumbnail),
                PageOutcome::NoPage => (None, None),
                PageOutcome::TransportError(e) => {
                    debug!("Intro lookup for {:?} failed: {}", name, e);
                    return ("transport_error", None);
                }
            };

        match self.source.lookup(name, ExtractScope::Full).await.normalize() {
            PageOutcome::Found {
                title,
                extract,
                thumbnail,
            } => {
                let thumbnail = first_thumbnail.or(thumbnail);
                ("full", Some(self.bio(&title, extract, thumbnail)))
            }
            PageOutcome::FoundNoExtract { title, thumbnail } => {
                let title = first_title.unwrap_or(title);
                let thumbnail = first_thumbnail.or(thumbnail);
                (
                    "placeholder",
                    Some(self.bio(&title, NO_BIOGRAPHY.to_string(), thumbnail)),
                )
            }
            PageOutcome::NoPage => match first_title {
                Some(title) => (
                    "placeholder",
                    Some(self.bio(&title, NO_BIOGRAPHY.to_string(), first_thumbnail)),
                ),
                None => ("no_page", None),
            },
            PageOutcome::TransportError(e) => {
                debug!("Full lookup for {:?} failed: {}", name, e);
                ("transport_error", None)
            }
        }
    }
}

#[async_trait]
impl<S: PageLookup> Encyclopedia for AuthorResolver<S> {
    async fn resolve_author(&self, name: &str) -> Option<AuthorBio> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let (outcome, bio) = self.resolve(name).await;
        debug!("Author enrichment for {:?}: {}", name, outcome);
        AUTHOR_ENRICHMENT.with_label_values(&[outcome]).inc();
        bio
    }
}
