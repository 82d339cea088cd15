use chrono::{DateTime, Utc};

/// Stored row for one feed item. `id` is derived from `link`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub site_id: String,
}
