use std::time::Duration;

use async_trait::async_trait;
use feed_rs::model::{Feed, Link};
use feed_rs::parser;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Channel, FeedDocument, FeedItem};

/// Anything that can turn a feed URL into a parsed document.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FeedDocument>;
}

pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("feed-indexer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for FeedFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedDocument> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::FeedStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        parse_feed(&bytes)
    }
}

/// Parse a syndication document into its channel fields and ordered items.
pub fn parse_feed(bytes: &[u8]) -> Result<FeedDocument> {
    let feed = parser::parse(bytes)?;
    Ok(document_from_feed(feed))
}

fn document_from_feed(feed: Feed) -> FeedDocument {
    let channel = Channel {
        title: feed.title.map(|t| t.content).unwrap_or_default(),
        link: primary_link(&feed.links),
        description: feed.description.map(|d| d.content).unwrap_or_default(),
    };

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            // RSS <description> lands in summary; fall back to full content
            let description = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();

            FeedItem {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                link: primary_link(&entry.links),
                description,
                pub_date: entry.published,
            }
        })
        .collect();

    FeedDocument { channel, items }
}

/// The first non-self link, since channels often carry an atom:link rel="self".
fn primary_link(links: &[Link]) -> String {
    links
        .iter()
        .find(|l| l.rel.as_deref() != Some("self"))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
        .unwrap_or_default()
}
