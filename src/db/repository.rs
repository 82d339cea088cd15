use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Article, Collection, Entity, Site};
use crate::sink::Sink;

use super::schema::SCHEMA;

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Site operations

    /// Insert the site, or refresh title and description if the id exists.
    pub async fn upsert_site(&self, site: Site) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO sites (id, url, title, link, description)
                       VALUES (?1, ?2, ?3, ?4, ?5)
                       ON CONFLICT(id) DO UPDATE SET
                           title = excluded.title,
                           description = excluded.description"#,
                    params![site.id, site.url, site.title, site.link, site.description],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    #[cfg(test)]
    pub async fn get_site(&self, id: &str) -> Result<Option<Site>> {
        use rusqlite::OptionalExtension;

        let id = id.to_string();
        let site = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, url, title, link, description FROM sites WHERE id = ?1",
                )?;
                let site = stmt.query_row(params![id], site_from_row).optional()?;
                Ok(site)
            })
            .await?;
        Ok(site)
    }

    // Article operations

    /// Insert the article, or refresh title and description if the id exists.
    /// Link, publish date and owning site are fixed at creation.
    pub async fn upsert_article(&self, article: Article) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO articles (id, title, link, description, pubdate, site_id)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                       ON CONFLICT(id) DO UPDATE SET
                           title = excluded.title,
                           description = excluded.description"#,
                    params![
                        article.id,
                        article.title,
                        article.link,
                        article.description,
                        article.pub_date.map(|dt| dt.to_rfc3339()),
                        article.site_id,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    #[cfg(test)]
    pub async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        use rusqlite::OptionalExtension;

        let id = id.to_string();
        let article = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, title, link, description, pubdate, site_id FROM articles WHERE id = ?1",
                )?;
                let article = stmt.query_row(params![id], article_from_row).optional()?;
                Ok(article)
            })
            .await?;
        Ok(article)
    }

    pub async fn count_articles(&self) -> Result<usize> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count as usize)
    }

    /// Every stored article id with its publish date, if one was recorded.
    pub async fn article_dates(&self) -> Result<Vec<(String, Option<DateTime<Utc>>)>> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT id, pubdate FROM articles")?;
                let rows = stmt
                    .query_map([], |row| {
                        let id: String = row.get(0)?;
                        let pubdate: Option<String> = row.get(1)?;
                        Ok((id, pubdate.and_then(|s| parse_datetime(&s))))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows)
    }

    pub async fn delete_row(&self, collection: Collection, id: &str) -> Result<()> {
        let id = id.to_string();
        let sql = format!("DELETE FROM {} WHERE id = ?1", collection.as_str());
        self.conn
            .call(move |conn| {
                conn.execute(&sql, params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    // Pending index deletes

    pub async fn add_pending_index_delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO pending_index_deletes (id) VALUES (?1)",
                    params![id],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn pending_index_deletes(&self) -> Result<Vec<String>> {
        let ids = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT id FROM pending_index_deletes ORDER BY failed_at")?;
                let ids = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<std::result::Result<Vec<String>, _>>()?;
                Ok(ids)
            })
            .await?;
        Ok(ids)
    }

    pub async fn clear_pending_index_delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM pending_index_deletes WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Sink for Repository {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn upsert(&self, entity: &Entity) -> Result<()> {
        match entity {
            Entity::Site(site) => self.upsert_site(site.clone()).await,
            Entity::Article(article) => self.upsert_article(article.clone()).await,
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.delete_row(collection, id).await
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

#[cfg(test)]
fn site_from_row(row: &rusqlite::Row) -> rusqlite::Result<Site> {
    Ok(Site {
        id: row.get(0)?,
        url: row.get(1)?,
        title: row.get(2)?,
        link: row.get(3)?,
        description: row.get(4)?,
    })
}

#[cfg(test)]
fn article_from_row(row: &rusqlite::Row) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        title: row.get(1)?,
        link: row.get(2)?,
        description: row.get(3)?,
        pub_date: row
            .get::<_, Option<String>>(4)?
            .and_then(|s| parse_datetime(&s)),
        site_id: row.get(5)?,
    })
}
