use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

mod config;
mod db;
mod error;
mod feed;
mod identity;
mod ingest;
mod models;
mod scheduler;
mod search;
mod sink;

use config::Config;
use db::Repository;
use error::{AppError, Result};
use feed::{load_feed_list, FeedFetcher};
use ingest::{DualSinkWriter, Reaper};
use scheduler::{Scheduler, SchedulerSettings};
use search::{ElasticClient, SearchIndex};

struct Args {
    config: Option<PathBuf>,
    feeds: Option<PathBuf>,
    once: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        feeds: None,
        once: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = iter.next().map(PathBuf::from),
            "--feeds" => args.feeds = iter.next().map(PathBuf::from),
            "--once" => args.once = true,
            other => return Err(AppError::Config(format!("unknown argument: {}", other))),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = Config::load(args.config.as_deref())?;

    let feeds_path = args.feeds.unwrap_or_else(|| config.feeds_path.clone());
    let feeds = load_feed_list(&feeds_path)?;
    tracing::info!("Loaded {} feeds from {:?}", feeds.len(), feeds_path);

    let store = Arc::new(Repository::new(&config.db_path).await?);
    tracing::info!(
        "Opened store at {} ({} articles)",
        config.db_path,
        store.count_articles().await?
    );

    let elastic = ElasticClient::new(&config.search_url, config.request_timeout())?;
    elastic.ping().await?;
    tracing::info!("Connected to search index at {}", config.search_url);

    let writer = Arc::new(DualSinkWriter::new(store, Arc::new(SearchIndex::new(elastic))));
    let reaper = Reaper::new(writer.clone(), config.retention());
    let source = Arc::new(FeedFetcher::new(config.request_timeout())?);

    let scheduler = Scheduler::new(
        feeds,
        source,
        writer,
        reaper,
        SchedulerSettings {
            interval: config.interval(),
            max_concurrent_feeds: config.max_concurrent_feeds,
            feed_timeout: config.feed_timeout(),
        },
    );

    let cancel = CancellationToken::new();

    if args.once {
        let report = scheduler.run_cycle(&cancel).await;
        report.log_summary();
        println!(
            "Ingested {} articles from {}/{} feeds",
            report.articles(),
            report.succeeded(),
            report.feeds.len()
        );
        if let Some(reap) = report.reap {
            println!(
                "Cleanup: {} scanned, {} deleted, {} retried, {} failed",
                reap.scanned, reap.deleted, reap.retried, reap.failed
            );
        }
        return Ok(());
    }

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    scheduler.run(cancel).await;
    Ok(())
}
