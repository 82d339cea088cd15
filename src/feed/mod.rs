mod fetcher;
mod list;
mod normalize;

#[cfg(test)]
pub use fetcher::parse_feed;
pub use fetcher::{FeedFetcher, FeedSource};
pub use list::load_feed_list;
pub use normalize::{normalize_article, normalize_site};
