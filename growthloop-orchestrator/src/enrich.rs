//! Image and SEO enrichment seams (spec.md §4.1 Content stage). Both are
//! named external collaborators out of scope per spec.md §2; these traits
//! fix the contract the Content stage calls through, with no-op stubs
//! standing in the way `StubReasoningService` stands in for the LLM.

use async_trait::async_trait;
use thiserror::Error;

use growthloop_reasoning::YouTubeDraft;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("enricher call timed out")]
    Timeout,
    #[error("enricher failed: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, EnrichError>;

/// Generates thumbnail art for a day's content. Called with the title and
/// the first 200 characters of the script (spec.md §4.1 Content stage).
#[async_trait]
pub trait ImageEnricher: Send + Sync {
    async fn generate_thumbnails(&self, title: &str, script_excerpt: &str) -> Result<Vec<String>>;
}

/// Rewrites a draft's title/tags/CTA for search visibility.
#[async_trait]
pub trait SeoEnricher: Send + Sync {
    async fn rewrite(&self, draft: YouTubeDraft) -> Result<YouTubeDraft>;
}

/// Default no-op image enricher: produces no thumbnails. Used when the
/// per-campaign image toggle is off and as the test/default wiring.
#[derive(Debug, Default)]
pub struct NoopImageEnricher;

#[async_trait]
impl ImageEnricher for NoopImageEnricher {
    async fn generate_thumbnails(&self, _title: &str, _script_excerpt: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Default no-op SEO enricher: returns the draft unchanged.
#[derive(Debug, Default)]
pub struct NoopSeoEnricher;

#[async_trait]
impl SeoEnricher for NoopSeoEnricher {
    async fn rewrite(&self, draft: YouTubeDraft) -> Result<YouTubeDraft> {
        Ok(draft)
    }
}

/// First 200 characters of `script`, on a char boundary (spec.md §4.1).
#[must_use]
pub fn script_excerpt(script: &str) -> &str {
    match script.char_indices().nth(200) {
        Some((idx, _)) => &script[..idx],
        None => script,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_excerpt_caps_at_200_chars() {
        let script = "a".repeat(500);
        assert_eq!(script_excerpt(&script).chars().count(), 200);
    }

    #[test]
    fn script_excerpt_passes_short_scripts_through() {
        assert_eq!(script_excerpt("short"), "short");
    }

    #[tokio::test]
    async fn noop_image_enricher_returns_no_thumbnails() {
        let enricher = NoopImageEnricher;
        let thumbs = enricher.generate_thumbnails("title", "excerpt").await.unwrap();
        assert!(thumbs.is_empty());
    }

    #[tokio::test]
    async fn noop_seo_enricher_returns_draft_unchanged() {
        let enricher = NoopSeoEnricher;
        let draft = YouTubeDraft {
            script: "s".into(),
            title: "t".into(),
            tags: vec!["tag".into()],
            cta: "subscribe".into(),
        };
        let rewritten = enricher.rewrite(draft.clone()).await.unwrap();
        assert_eq!(rewritten.title, draft.title);
    }
}
