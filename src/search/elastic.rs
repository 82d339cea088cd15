use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use super::DocumentApi;
use crate::error::{AppError, Result};
use crate::models::{Collection, IndexDocument};

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    doc: &'a IndexDocument,
}

/// Elasticsearch-compatible REST client for the document endpoints.
pub struct ElasticClient {
    client: Client,
    base_url: Url,
}

impl ElasticClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid search_url {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "search_url {} cannot be used as a base URL",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Check that the cluster answers at all.
    pub async fn ping(&self) -> Result<()> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        check_status(response).await?;
        Ok(())
    }

    fn document_url(&self, collection: Collection, action: &str, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(&[collection.as_str(), action, id]);
        }
        url
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::SearchIndex {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl DocumentApi for ElasticClient {
    async fn update(&self, collection: Collection, id: &str, doc: &IndexDocument) -> Result<()> {
        let response = self
            .client
            .post(self.document_url(collection, "_update", id))
            .json(&UpdateRequest { doc })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn create(&self, collection: Collection, id: &str, doc: &IndexDocument) -> Result<()> {
        let response = self
            .client
            .put(self.document_url(collection, "_create", id))
            .json(doc)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.document_url(collection, "_doc", id))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
