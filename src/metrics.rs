use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct BotMetrics {
    documents_summarized: AtomicU64,
    fragments_summarized: AtomicU64,
}

impl BotMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summarized document and the number of fragments it produced.
    pub fn record_document(&self, fragment_count: u64) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.fragments_summarized
            .fetch_add(fragment_count, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            fragments_summarized: self.fragments_summarized.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    /// Number of documents summarized since startup.
    pub documents_summarized: u64,
    /// Total fragment count summarized across all documents.
    pub fragments_summarized: u64,
}
