mod elastic;
#[cfg(test)]
pub mod memory;

pub use elastic::ElasticClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Collection, Entity, IndexDocument};
use crate::sink::Sink;

/// Raw document operations of a search backend.
///
/// `update` and `remove` report a missing document as a 404
/// [`AppError::SearchIndex`](crate::error::AppError::SearchIndex).
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Partial update: merge `doc` into the existing document.
    async fn update(&self, collection: Collection, id: &str, doc: &IndexDocument) -> Result<()>;

    async fn create(&self, collection: Collection, id: &str, doc: &IndexDocument) -> Result<()>;

    async fn remove(&self, collection: Collection, id: &str) -> Result<()>;
}

/// Search index sink: merge-update, falling back to create when the document is missing.
pub struct SearchIndex<D> {
    api: D,
}

impl<D: DocumentApi> SearchIndex<D> {
    pub fn new(api: D) -> Self {
        Self { api }
    }

    #[cfg(test)]
    pub fn api(&self) -> &D {
        &self.api
    }
}

#[async_trait]
impl<D: DocumentApi> Sink for SearchIndex<D> {
    fn name(&self) -> &'static str {
        "index"
    }

    async fn upsert(&self, entity: &Entity) -> Result<()> {
        let collection = entity.collection();
        let doc = entity.document();

        match self.api.update(collection, entity.id(), &doc).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!("{}/{} not indexed yet, creating", collection, entity.id());
                self.api.create(collection, entity.id(), &doc).await
            }
            other => other,
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        match self.api.remove(collection, id).await {
            Err(e) if e.is_not_found() => Ok(()),
            other => other,
        }
    }
}
