//! Record sinks: where normalized records go as they are produced.

use crate::error::Result;
use crate::normalizer::NormalizedRecord;
use async_trait::async_trait;
use std::sync::Mutex;

/// Consumer of the engine's output stream.
///
/// The engine pushes records as they are produced; the consuming layer
/// (dataset writer, file writer, UI) decides what storage means. A sink
/// failure aborts the run, since losing records silently would defeat
/// the point of scraping them.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Accept one record.
    ///
    /// # Errors
    /// Returns error if the record cannot be accepted; this aborts the
    /// run.
    async fn push(&self, record: NormalizedRecord) -> Result<()>;
}

/// Sink collecting records in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    records: Mutex<Vec<NormalizedRecord>>,
}

impl CollectingSink {
    /// Create an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().expect("records lock poisoned").len()
    }

    /// Whether nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the collected records.
    #[must_use]
    pub fn take(&self) -> Vec<NormalizedRecord> {
        std::mem::take(&mut *self.records.lock().expect("records lock poisoned"))
    }
}

#[async_trait]
impl RecordSink for CollectingSink {
    async fn push(&self, record: NormalizedRecord) -> Result<()> {
        self.records
            .lock()
            .expect("records lock poisoned")
            .push(record);
        Ok(())
    }
}
