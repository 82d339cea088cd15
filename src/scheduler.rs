use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::feed::FeedSource;
use crate::ingest::{process_feed, DualSinkWriter, FeedOutcome, FeedReport, ReapReport, Reaper};

pub struct SchedulerSettings {
    pub interval: Duration,
    pub max_concurrent_feeds: usize,
    pub feed_timeout: Duration,
}

/// Summary of one ingestion cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub feeds: Vec<FeedReport>,
    pub reap: Option<ReapReport>,
    pub elapsed: Duration,
}

impl CycleReport {
    pub fn succeeded(&self) -> usize {
        self.feeds.iter().filter(|f| f.outcome.is_success()).count()
    }

    pub fn articles(&self) -> usize {
        self.feeds
            .iter()
            .map(|f| match f.outcome {
                FeedOutcome::Ingested { articles, .. } => articles,
                _ => 0,
            })
            .sum()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            feeds = self.feeds.len(),
            succeeded = self.succeeded(),
            failed = self.feeds.len() - self.succeeded(),
            articles = self.articles(),
            elapsed_ms = self.elapsed.as_millis() as u64,
            "Cycle finished"
        );
    }
}

/// Runs ingestion cycles over a fixed set of feeds, one at a time.
pub struct Scheduler {
    feeds: Vec<String>,
    source: Arc<dyn FeedSource>,
    writer: Arc<DualSinkWriter>,
    reaper: Reaper,
    settings: SchedulerSettings,
}

impl Scheduler {
    pub fn new(
        feeds: Vec<String>,
        source: Arc<dyn FeedSource>,
        writer: Arc<DualSinkWriter>,
        reaper: Reaper,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            feeds,
            source,
            writer,
            reaper,
            settings,
        }
    }

    /// Run a cycle immediately, then one per interval tick until cancelled.
    ///
    /// Cycles never overlap: ticks missed while a cycle runs collapse into one.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut timer = tokio::time::interval(self.settings.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = timer.tick() => {}
            }

            let report = self.run_cycle(&cancel).await;
            report.log_summary();

            if cancel.is_cancelled() {
                break;
            }
            tracing::info!("Cycle over. Waiting for the next one...");
        }

        tracing::info!("Scheduler stopped");
    }

    /// Ingest every feed through a bounded pool, then sweep expired articles.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> CycleReport {
        tracing::info!("Scraping {} feeds...", self.feeds.len());
        let started = Instant::now();

        let feeds: Vec<FeedReport> = stream::iter(self.feeds.iter().cloned())
            .map(|url| self.run_feed(url, cancel))
            .buffer_unordered(self.settings.max_concurrent_feeds.max(1))
            .inspect(FeedReport::log)
            .collect()
            .await;

        let reap = if cancel.is_cancelled() {
            None
        } else {
            match self.reaper.reap().await {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::error!("Cleanup failed: {}", e);
                    None
                }
            }
        };

        CycleReport {
            feeds,
            reap,
            elapsed: started.elapsed(),
        }
    }

    async fn run_feed(&self, url: String, cancel: &CancellationToken) -> FeedReport {
        let work = process_feed(self.source.as_ref(), &self.writer, &url);

        let outcome = tokio::select! {
            _ = cancel.cancelled() => FeedOutcome::Cancelled,
            result = tokio::time::timeout(self.settings.feed_timeout, work) => {
                result.unwrap_or(FeedOutcome::TimedOut)
            }
        };

        FeedReport { url, outcome }
    }
}
