use crate::error::{AppError, Result};
use crate::feed::FeedSource;
use crate::models::FeedDocument;

use super::writer::{ArticleStats, DualSinkWriter};

/// How processing one feed ended for this cycle.
#[derive(Debug)]
pub enum FeedOutcome {
    Ingested {
        site_id: String,
        articles: usize,
        truncated: bool,
    },
    Validation(AppError),
    Fetch(AppError),
    Persistence(AppError),
    TimedOut,
    Cancelled,
}

impl FeedOutcome {
    fn from_error(err: AppError) -> Self {
        match err {
            AppError::Validation(_) => FeedOutcome::Validation(err),
            e if e.is_fetch() => FeedOutcome::Fetch(e),
            e => FeedOutcome::Persistence(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FeedOutcome::Ingested { .. })
    }
}

#[derive(Debug)]
pub struct FeedReport {
    pub url: String,
    pub outcome: FeedOutcome,
}

impl FeedReport {
    pub fn log(&self) {
        match &self.outcome {
            FeedOutcome::Ingested {
                site_id,
                articles,
                truncated,
            } => tracing::debug!(
                "Ingested {} articles from {} (site {}){}",
                articles,
                self.url,
                site_id,
                if *truncated { " (truncated)" } else { "" }
            ),
            FeedOutcome::Validation(e) => tracing::warn!("Rejected {}: {}", self.url, e),
            FeedOutcome::Fetch(e) => tracing::warn!("Failed to fetch {}: {}", self.url, e),
            FeedOutcome::Persistence(e) => tracing::warn!("Failed to store {}: {}", self.url, e),
            FeedOutcome::TimedOut => tracing::warn!("Timed out processing {}", self.url),
            FeedOutcome::Cancelled => tracing::debug!("Cancelled processing {}", self.url),
        }
    }
}

/// Fetch one feed and write its site and articles. Every failure stays local to this feed.
pub async fn process_feed(source: &dyn FeedSource, writer: &DualSinkWriter, url: &str) -> FeedOutcome {
    let document = match source.fetch(url).await {
        Ok(document) => document,
        Err(e) => return FeedOutcome::from_error(e),
    };

    match ingest_document(writer, url, &document).await {
        Ok((site_id, stats)) => FeedOutcome::Ingested {
            site_id,
            articles: stats.written,
            truncated: stats.truncated,
        },
        Err(e) => FeedOutcome::from_error(e),
    }
}

/// The site is written before any of its articles.
pub async fn ingest_document(
    writer: &DualSinkWriter,
    url: &str,
    document: &FeedDocument,
) -> Result<(String, ArticleStats)> {
    let site_id = writer.upsert_site(url, &document.channel).await?;
    let stats = writer.upsert_articles(&site_id, &document.items).await?;
    Ok((site_id, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::parse_feed;
    use crate::identity::entity_id;
    use crate::ingest::testing::{fixture, StaticSource};
    use crate::models::Collection;
    use serde_json::json;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>T</title>
    <link>http://a</link>
    <description>D</description>
    <item>
      <title>I1</title>
      <link>http://a/1</link>
      <description>D1</description>
      <pubDate>Mon, 05 Oct 2026 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>I2</title>
      <link>http://a/2</link>
      <description></description>
      <pubDate>Tue, 06 Oct 2026 10:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[tokio::test]
    async fn ingests_site_and_valid_prefix_of_items() {
        let (_dir, writer, index) = fixture().await;
        let source = StaticSource::default().with_document("http://a", parse_feed(FEED.as_bytes()).unwrap());

        let outcome = process_feed(&source, &writer, "http://a").await;

        let site_id = entity_id("http://a");
        match outcome {
            FeedOutcome::Ingested { site_id: id, articles, truncated } => {
                assert_eq!(id, site_id);
                assert_eq!(articles, 1);
                assert!(truncated);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let site = writer.store().get_site(&site_id).await.unwrap().unwrap();
        assert_eq!(site.title, "T");
        assert_eq!(
            index.api().get(Collection::Sites, &site_id),
            Some(json!({"title": "T", "description": "D"}))
        );

        assert_eq!(writer.store().count_articles().await.unwrap(), 1);
        assert!(writer.store().get_article(&entity_id("http://a/1")).await.unwrap().is_some());
        assert!(writer.store().get_article(&entity_id("http://a/2")).await.unwrap().is_none());
        assert_eq!(index.api().len(Collection::Articles), 1);
        assert!(index.api().get(Collection::Articles, &entity_id("http://a/1")).is_some());
    }

    #[tokio::test]
    async fn classifies_failures() {
        let (_dir, writer, _index) = fixture().await;
        let mut invalid = parse_feed(FEED.as_bytes()).unwrap();
        invalid.channel.title.clear();
        let source = StaticSource::default().with_document("http://bad", invalid);

        assert!(matches!(
            process_feed(&source, &writer, "http://bad").await,
            FeedOutcome::Validation(_)
        ));
        assert!(matches!(
            process_feed(&source, &writer, "http://unknown").await,
            FeedOutcome::Fetch(_)
        ));
    }

    #[tokio::test]
    async fn index_failure_is_a_persistence_outcome() {
        let (_dir, writer, index) = fixture().await;
        index.api().fail_on(&entity_id("http://a"));
        let source = StaticSource::default().with_document("http://a", parse_feed(FEED.as_bytes()).unwrap());

        let outcome = process_feed(&source, &writer, "http://a").await;

        assert!(matches!(outcome, FeedOutcome::Persistence(_)));
        assert_eq!(writer.store().count_articles().await.unwrap(), 0);
    }
}
