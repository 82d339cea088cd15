use chrono::{DateTime, Utc};

/// A fetched feed, before any validation or sanitizing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedDocument {
    pub channel: Channel,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: Option<DateTime<Utc>>,
}
