use std::sync::Arc;
use std::time::Duration;

use kep_core::{
    AttemptOutcome, ChunkState, EndpointConfig, KepError, Record, Transport, UploadPolicy,
    UploadReport, chunk_count, partition, to_json,
};

use crate::backoff::retry_wait;
use crate::timer::Timer;
use crate::transport::HttpTransport;

/// Builder for [`BatchUploader`].
#[derive(Default)]
pub struct BatchUploaderBuilder {
    transport: Option<Arc<dyn Transport>>,
    endpoint: Option<EndpointConfig>,
    policy: UploadPolicy,
}

impl BatchUploaderBuilder {
    /// Create a builder with the default policy and no transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver through a custom transport.
    ///
    /// Takes precedence over [`endpoint`](Self::endpoint).
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Deliver over HTTP to the given endpoint.
    #[must_use]
    pub fn endpoint(mut self, cfg: EndpointConfig) -> Self {
        self.endpoint = Some(cfg);
        self
    }

    /// Replace the whole upload policy.
    #[must_use]
    pub const fn policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Records per request body.
    #[must_use]
    pub const fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.policy.chunk_size = chunk_size;
        self
    }

    /// Attempts allowed per chunk, the first one included.
    #[must_use]
    pub const fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.policy.max_attempts = max_attempts;
        self
    }

    /// Wait between a rejected attempt and the next one.
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.policy.retry_delay = delay;
        self
    }

    /// Random extra wait, in percent of the retry delay. Zero disables it.
    #[must_use]
    pub const fn jitter_percent(mut self, percent: u8) -> Self {
        self.policy.jitter_percent = percent;
        self
    }

    /// Build the uploader.
    ///
    /// Without an explicit transport or endpoint, posts to the default endpoint
    /// with an empty token.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an invalid policy or endpoint URL, or
    /// `Transport` if the HTTP client cannot be created.
    pub fn build(self) -> Result<BatchUploader, KepError> {
        self.policy.validate()?;
        let transport: Arc<dyn Transport> = match (self.transport, self.endpoint) {
            (Some(t), _) => t,
            (None, Some(cfg)) => Arc::new(HttpTransport::new(cfg)?),
            (None, None) => Arc::new(HttpTransport::new(EndpointConfig::default())?),
        };
        Ok(BatchUploader {
            transport,
            policy: self.policy,
        })
    }
}

/// Splits records into chunks and delivers them in order, retrying rejected chunks.
///
/// Each chunk is attempted at most `max_attempts` times with `retry_delay`
/// between attempts. The first exhausted chunk stops the upload; later chunks
/// are never sent and earlier ones stay delivered.
#[derive(Clone)]
pub struct BatchUploader {
    transport: Arc<dyn Transport>,
    policy: UploadPolicy,
}

impl std::fmt::Debug for BatchUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchUploader")
            .field("transport", &self.transport.name())
            .field("policy", &self.policy)
            .finish()
    }
}

impl BatchUploader {
    /// Start building a new uploader.
    #[must_use]
    pub fn builder() -> BatchUploaderBuilder {
        BatchUploaderBuilder::new()
    }

    /// Policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Upload all records; `true` if every chunk was acknowledged.
    ///
    /// An empty slice sends nothing and returns `true`.
    ///
    /// # Errors
    /// Fails if a chunk cannot be serialized or the transport cannot complete
    /// a request. Neither case is retried.
    pub async fn upload(&self, records: &[Record]) -> Result<bool, KepError> {
        Ok(self.upload_with_report(records).await?.is_success())
    }

    /// Upload all records and describe what was delivered.
    ///
    /// # Errors
    /// See [`upload`](Self::upload).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kep::uploader::upload",
            skip(self, records),
            fields(
                records = records.len(),
                chunk_size = self.policy.chunk_size,
                transport = self.transport.name(),
            ),
        )
    )]
    pub async fn upload_with_report(&self, records: &[Record]) -> Result<UploadReport, KepError> {
        let timer = Timer::start();
        let mut report = UploadReport {
            chunks_total: chunk_count(records.len(), self.policy.chunk_size),
            ..UploadReport::default()
        };

        for (index, chunk) in partition(records, self.policy.chunk_size)?
            .into_iter()
            .enumerate()
        {
            let body = to_json(chunk)?;
            let state = self.deliver(index, &body).await?;
            report.attempts += state.attempts();
            if let ChunkState::Delivered { .. } = state {
                report.chunks_delivered += 1;
                report.records_delivered += chunk.len();
            } else {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    chunk = index,
                    attempts = state.attempts(),
                    "chunk rejected on every attempt; aborting upload"
                );
                report.failed_chunk = Some(index);
                report.elapsed = timer.elapsed();
                return Ok(report);
            }
        }

        report.elapsed = timer.elapsed();
        Ok(report)
    }

    /// Drive one chunk to a terminal state.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kep::uploader::deliver",
            skip(self, body),
            fields(chunk = index, bytes = body.len()),
        )
    )]
    async fn deliver(&self, index: usize, body: &str) -> Result<ChunkState, KepError> {
        #[cfg(not(feature = "tracing"))]
        let _ = index;
        let mut state = ChunkState::Pending;
        loop {
            state = state.begin_attempt();
            let status = self.transport.post(body).await?;
            let outcome = AttemptOutcome::from_status(status);
            state = state.on_outcome(outcome, self.policy.max_attempts);
            if state.is_terminal() {
                return Ok(state);
            }

            let wait = retry_wait(self.policy.retry_delay, self.policy.jitter_percent);
            #[cfg(feature = "tracing")]
            tracing::warn!(
                status,
                attempt = state.attempts(),
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "chunk rejected; retrying"
            );
            tokio::time::sleep(wait).await;
        }
    }
}
