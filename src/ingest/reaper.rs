use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::models::Collection;

use super::writer::DualSinkWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReapReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
    /// Index deletes left over from earlier sweeps that succeeded this time.
    pub retried: usize,
}

/// Evicts articles older than the retention window from both sinks.
/// Sites are never evicted.
pub struct Reaper {
    writer: Arc<DualSinkWriter>,
    retention: Duration,
}

impl Reaper {
    pub fn new(writer: Arc<DualSinkWriter>, retention: Duration) -> Self {
        Self { writer, retention }
    }

    pub async fn reap(&self) -> Result<ReapReport> {
        self.reap_at(Utc::now()).await
    }

    /// Articles leave the store first and the index second. When the index
    /// delete fails the id is recorded and retried at the start of later sweeps;
    /// when the store delete fails the row stays and is seen again next sweep.
    pub async fn reap_at(&self, now: DateTime<Utc>) -> Result<ReapReport> {
        tracing::info!("Cleanup...");

        let store = self.writer.store();
        let mut report = ReapReport::default();

        for id in store.pending_index_deletes().await? {
            match self.writer.index().delete(Collection::Articles, &id).await {
                Ok(()) => {
                    store.clear_pending_index_delete(&id).await?;
                    report.retried += 1;
                }
                Err(e) => {
                    tracing::warn!("Index delete of article {} still failing: {}", id, e);
                    report.failed += 1;
                }
            }
        }

        for (id, pub_date) in store.article_dates().await? {
            report.scanned += 1;
            if !self.is_expired(pub_date, now) {
                continue;
            }

            if let Err(e) = store.delete_row(Collection::Articles, &id).await {
                tracing::warn!("Failed to delete article {} from the store: {}", id, e);
                report.failed += 1;
                continue;
            }

            match self.writer.index().delete(Collection::Articles, &id).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    tracing::warn!("Failed to delete article {} from the index: {}", id, e);
                    store.add_pending_index_delete(&id).await?;
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Cleanup done. {} rows scanned, {} rows deleted, {} index deletes retried, {} failed",
            report.scanned,
            report.deleted,
            report.retried,
            report.failed
        );
        Ok(report)
    }

    // undated rows count as infinitely old
    fn is_expired(&self, pub_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        pub_date.map_or(true, |published| now - published > self.retention)
    }
}
