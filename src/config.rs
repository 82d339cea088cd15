use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};

const APP_DIR: &str = "feed-indexer";
const DB_PATH_ENV: &str = "FEED_INDEXER_DB_PATH";
const SEARCH_URL_ENV: &str = "FEED_INDEXER_SEARCH_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_feeds_path")]
    pub feeds_path: PathBuf,

    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_interval")]
    pub interval_minutes: u64,

    #[serde(default = "default_retention")]
    pub retention_hours: u64,

    #[serde(default = "default_max_concurrent_feeds")]
    pub max_concurrent_feeds: usize,

    #[serde(default = "default_feed_timeout")]
    pub feed_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("feeds.db").to_string_lossy().to_string()
}

fn default_feeds_path() -> PathBuf {
    PathBuf::from("feeds.txt")
}

fn default_search_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_interval() -> u64 {
    60
}

fn default_retention() -> u64 {
    72
}

fn default_max_concurrent_feeds() -> usize {
    5
}

fn default_feed_timeout() -> u64 {
    120
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            feeds_path: default_feeds_path(),
            search_url: default_search_url(),
            interval_minutes: default_interval(),
            retention_hours: default_retention(),
            max_concurrent_feeds: default_max_concurrent_feeds(),
            feed_timeout_secs: default_feed_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load from `path` (or the default location), creating the file with defaults if missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save(&config_path)?;
            config
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(db_path) = var(DB_PATH_ENV) {
            self.db_path = db_path;
        }
        if let Some(search_url) = var(SEARCH_URL_ENV) {
            self.search_url = search_url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let zero = [
            ("interval_minutes", self.interval_minutes == 0),
            ("retention_hours", self.retention_hours == 0),
            ("max_concurrent_feeds", self.max_concurrent_feeds == 0),
            ("feed_timeout_secs", self.feed_timeout_secs == 0),
            ("request_timeout_secs", self.request_timeout_secs == 0),
        ];
        if let Some((name, _)) = zero.iter().find(|(_, is_zero)| *is_zero) {
            return Err(AppError::Config(format!("{} must be greater than zero", name)));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }

    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::hours(self.retention_hours as i64)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
