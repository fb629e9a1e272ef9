//! Bounded history of recent samples
//!
//! Backing store for the trend view. The source returns a full recent
//! window on every history fetch, so the buffer is replaced wholesale each
//! cycle; no incremental merging.

use crate::sample::Sample;

/// Default number of samples retained for the trend view
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Ordered, bounded store of recent samples.
///
/// Samples are kept in fetch order, which the source guarantees to be
/// chronologically ascending. When a replacement sequence exceeds the
/// capacity, only the most-recent entries (the tail) are retained.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: Vec<Sample>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::new(),
            capacity,
        }
    }

    /// Overwrite the buffer with a new ordered window of samples.
    ///
    /// Sequences longer than the capacity are truncated to the last
    /// `capacity` entries, preserving relative order.
    pub fn replace(&mut self, samples: Vec<Sample>) {
        if samples.len() > self.capacity {
            let skip = samples.len() - self.capacity;
            self.samples = samples.into_iter().skip(skip).collect();
        } else {
            self.samples = samples;
        }
    }

    /// Read-only copy of the current window for the presentation layer.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.clone()
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if no history has been fetched yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
