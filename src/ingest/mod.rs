mod pipeline;
mod reaper;
#[cfg(test)]
pub(crate) mod testing;
mod writer;

pub use pipeline::{process_feed, FeedOutcome, FeedReport};
pub use reaper::{ReapReport, Reaper};
pub use writer::DualSinkWriter;
