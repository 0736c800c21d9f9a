//! Progress reporting for analysis runs

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::types::LineRange;

/// Milestones reported while an analysis runs
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Analysis of one input started
    AnalysisStarted { name: String, bytes: usize },

    /// Input is too large for one request and was split
    ChunkingPlanned { name: String, chunks: usize },

    /// A chunk was claimed by a worker
    ChunkStarted { chunk_id: usize, total: usize, line_range: LineRange },

    /// A chunk's response was parsed
    ChunkCompleted { chunk_id: usize, total: usize, elapsed: Duration },

    /// Incremental text from a streaming response
    ResponseDelta { text: String },

    /// Consolidation of chunk results started
    AggregationStarted { chunks: usize },

    /// Consolidation fell back to the local merge
    AggregationFallback { reason: String },

    /// Cross-file comparison started
    ComparisonStarted { files: usize },

    /// Analysis of one input finished
    Completed { name: String, elapsed: Duration },
}

/// Receives progress events; called synchronously, possibly from worker threads
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Sink that logs progress through tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProgress;

impl ProgressSink for LoggingProgress {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::AnalysisStarted { name, bytes } => {
                info!(input = %name, bytes, "Starting analysis");
            }
            ProgressEvent::ChunkingPlanned { name, chunks } => {
                info!(input = %name, chunks, "Input split into chunks");
            }
            ProgressEvent::ChunkStarted { chunk_id, total, line_range } => {
                debug!(chunk = chunk_id + 1, total, start = line_range.start, end = line_range.end, "Analyzing chunk");
            }
            ProgressEvent::ChunkCompleted { chunk_id, total, elapsed } => {
                info!(chunk = chunk_id + 1, total, elapsed_ms = elapsed.as_millis() as u64, "Chunk analyzed");
            }
            ProgressEvent::ResponseDelta { text } => {
                debug!(bytes = text.len(), "Received response delta");
            }
            ProgressEvent::AggregationStarted { chunks } => {
                info!(chunks, "Consolidating chunk results");
            }
            ProgressEvent::AggregationFallback { reason } => {
                warn!(reason = %reason, "Consolidation unavailable, merging locally");
            }
            ProgressEvent::ComparisonStarted { files } => {
                info!(files, "Comparing files");
            }
            ProgressEvent::Completed { name, elapsed } => {
                info!(input = %name, elapsed_ms = elapsed.as_millis() as u64, "Analysis complete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSink {
        count: Arc<AtomicUsize>,
    }

    impl ProgressSink for CountingSink {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn sinks_receive_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let sink = CountingSink { count: count.clone() };
        sink.on_progress(&ProgressEvent::AggregationStarted { chunks: 2 });
        sink.on_progress(&ProgressEvent::ComparisonStarted { files: 3 });
        NoopProgress.on_progress(&ProgressEvent::ComparisonStarted { files: 3 });
        LoggingProgress.on_progress(&ProgressEvent::AggregationFallback { reason: "offline".into() });
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
