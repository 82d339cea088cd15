use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    FeedParse(#[from] feed_rs::parser::ParseFeedError),

    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Feed returned HTTP {status} ({url})")]
    FeedStatus { url: String, status: u16 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Search index error: {status} :: {body}")]
    SearchIndex { status: u16, body: String },
}

impl AppError {
    /// True for a search index response saying the document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::SearchIndex { status: 404, .. })
    }

    /// Fetch-side failures: the feed could not be retrieved or parsed.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::FeedParse(_) | AppError::FeedStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
