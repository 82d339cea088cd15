use std::sync::Arc;

use crate::db::Repository;
use crate::error::Result;
use crate::feed::{normalize_article, normalize_site};
use crate::models::{Channel, Entity, FeedItem};
use crate::sink::Sink;

/// Result of writing one feed's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArticleStats {
    pub written: usize,
    /// An incomplete item stopped the feed before its last item.
    pub truncated: bool,
}

/// Replicates entities into the store and then the search index.
///
/// There is no transaction across the two: when the index write fails after
/// the store write succeeded, the next cycle that sees the same feed repairs it.
pub struct DualSinkWriter {
    store: Arc<Repository>,
    index: Arc<dyn Sink>,
}

impl DualSinkWriter {
    pub fn new(store: Arc<Repository>, index: Arc<dyn Sink>) -> Self {
        Self { store, index }
    }

    pub fn store(&self) -> &Repository {
        &self.store
    }

    pub fn index(&self) -> &dyn Sink {
        self.index.as_ref()
    }

    fn sinks(&self) -> [&dyn Sink; 2] {
        [self.store.as_ref() as &dyn Sink, self.index.as_ref()]
    }

    pub async fn write(&self, entity: &Entity) -> Result<()> {
        for sink in self.sinks() {
            if let Err(e) = sink.upsert(entity).await {
                tracing::debug!(
                    "{} upsert failed for {}/{}: {}",
                    sink.name(),
                    entity.collection(),
                    entity.id(),
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// Validate and write the feed's site, returning its id.
    pub async fn upsert_site(&self, feed_url: &str, channel: &Channel) -> Result<String> {
        let site = normalize_site(feed_url, channel)?;
        let site_id = site.id.clone();
        self.write(&Entity::Site(site)).await?;
        Ok(site_id)
    }

    /// Write items in feed order, stopping at the first incomplete one.
    ///
    /// A sink error aborts the remaining items and is returned.
    pub async fn upsert_articles(&self, site_id: &str, items: &[FeedItem]) -> Result<ArticleStats> {
        let mut stats = ArticleStats::default();

        for (position, item) in items.iter().enumerate() {
            let Some(article) = normalize_article(site_id, item) else {
                tracing::info!(
                    "Empty field in item {} of site {}, skipping the remaining {} items",
                    position,
                    site_id,
                    items.len() - position
                );
                stats.truncated = true;
                break;
            };

            if article.pub_date.is_none() {
                tracing::debug!(
                    "Article {} has no publish date, the next cleanup will evict it",
                    article.link
                );
            }
            self.write(&Entity::Article(article)).await?;
            stats.written += 1;
        }

        Ok(stats)
    }
}
