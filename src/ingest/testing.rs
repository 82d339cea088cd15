use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::DualSinkWriter;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::feed::FeedSource;
use crate::models::{Channel, FeedDocument, FeedItem};
use crate::search::memory::MemoryIndex;
use crate::search::SearchIndex;

/// A writer over a fresh on-disk store and an in-memory index.
pub async fn fixture() -> (TempDir, Arc<DualSinkWriter>, Arc<SearchIndex<MemoryIndex>>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feeds.db");
    let store = Arc::new(Repository::new(path.to_str().unwrap()).await.unwrap());
    let index = Arc::new(SearchIndex::new(MemoryIndex::default()));
    let writer = Arc::new(DualSinkWriter::new(store, index.clone()));
    (dir, writer, index)
}

/// Serves canned documents; unknown URLs answer 404 and hanging URLs never answer.
#[derive(Default)]
pub struct StaticSource {
    documents: HashMap<String, FeedDocument>,
    hanging: HashSet<String>,
    fetches: AtomicUsize,
    cancel_on_fetch: Option<CancellationToken>,
}

impl StaticSource {
    pub fn with_document(mut self, url: &str, document: FeedDocument) -> Self {
        self.documents.insert(url.to_string(), document);
        self
    }

    pub fn with_hanging(mut self, url: &str) -> Self {
        self.hanging.insert(url.to_string());
        self
    }

    /// Cancel `token` as soon as any fetch starts.
    pub fn cancelling(mut self, token: CancellationToken) -> Self {
        self.cancel_on_fetch = Some(token);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<FeedDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = &self.cancel_on_fetch {
            token.cancel();
        }
        if self.hanging.contains(url) {
            std::future::pending::<()>().await;
        }
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::FeedStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// A valid feed whose items are published at the given instants.
pub fn document(title: &str, link: &str, items: &[(&str, Option<DateTime<Utc>>)]) -> FeedDocument {
    FeedDocument {
        channel: Channel {
            title: title.to_string(),
            link: link.to_string(),
            description: format!("{} description", title),
        },
        items: items
            .iter()
            .map(|(item_link, pub_date)| FeedItem {
                title: format!("title of {}", item_link),
                link: item_link.to_string(),
                description: format!("description of {}", item_link),
                pub_date: *pub_date,
            })
            .collect(),
    }
}
