//! Report envelopes produced by the uploader.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Summary of a batch upload.
///
/// `failed_chunk` carries the zero-based index of the chunk that exhausted its
/// attempt budget. Chunks before it were delivered and stay delivered; chunks
/// after it were never attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadReport {
    /// Number of chunks the collection was split into.
    pub chunks_total: usize,
    /// Number of chunks acknowledged by the endpoint.
    pub chunks_delivered: usize,
    /// Number of records contained in the delivered chunks.
    pub records_delivered: usize,
    /// Transport calls made across all chunks.
    pub attempts: u32,
    /// Index of the chunk that ran out of attempts, if any.
    pub failed_chunk: Option<usize>,
    /// Wall-clock time the upload took, retry waits included.
    pub elapsed: Duration,
}

impl UploadReport {
    /// True when every chunk was delivered.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed_chunk.is_none() && self.chunks_delivered == self.chunks_total
    }
}
