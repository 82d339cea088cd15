use crate::error::{AppError, Result};
use crate::identity::entity_id;
use crate::models::{Article, Channel, FeedItem, Site};

const UNSAFE_QUOTE: char = '\'';
const QUOTE_SUBSTITUTE: char = '`';

/// Replace single quotes with backticks in a text field.
///
/// Store writes are parameterized regardless; this only keeps the persisted
/// text identical across both sinks.
pub fn sanitize(text: &str) -> String {
    text.replace(UNSAFE_QUOTE, &QUOTE_SUBSTITUTE.to_string())
}

/// Build the site row for a feed, rejecting channels without title or link.
pub fn normalize_site(feed_url: &str, channel: &Channel) -> Result<Site> {
    if channel.title.is_empty() || channel.link.is_empty() {
        return Err(AppError::Validation(format!(
            "channel of {} has an empty title or link",
            feed_url
        )));
    }

    Ok(Site {
        id: entity_id(feed_url),
        url: feed_url.to_string(),
        title: sanitize(&channel.title),
        link: sanitize(&channel.link),
        description: sanitize(&channel.description),
    })
}

/// Build the article row for an item, or `None` when a required field is empty.
pub fn normalize_article(site_id: &str, item: &FeedItem) -> Option<Article> {
    if item.title.is_empty() || item.link.is_empty() || item.description.is_empty() {
        return None;
    }

    Some(Article {
        id: entity_id(&item.link),
        title: sanitize(&item.title),
        link: sanitize(&item.link),
        description: sanitize(&item.description),
        pub_date: item.pub_date,
        site_id: site_id.to_string(),
    })
}
