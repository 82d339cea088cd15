pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- sites table
CREATE TABLE IF NOT EXISTS sites (
    id TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    link TEXT NOT NULL,
    description TEXT NOT NULL
);

-- articles table
CREATE TABLE IF NOT EXISTS articles (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    link TEXT NOT NULL,
    description TEXT NOT NULL,
    pubdate TEXT,
    site_id TEXT NOT NULL REFERENCES sites(id)
);

CREATE INDEX IF NOT EXISTS idx_articles_pubdate ON articles(pubdate);
CREATE INDEX IF NOT EXISTS idx_articles_site_id ON articles(site_id);

-- articles removed from the store whose index delete still has to happen
CREATE TABLE IF NOT EXISTS pending_index_deletes (
    id TEXT PRIMARY KEY,
    failed_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
