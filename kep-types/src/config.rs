//! Configuration types shared by the uploader and its transports.

use core::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::KepError;

/// Datapoints endpoint used when no URL is configured.
pub const DEFAULT_ENDPOINT: &str = "https://minikep-db.herokuapp.com/api/datapoints";

/// Request header carrying the API token.
pub const API_TOKEN_HEADER: &str = "API_TOKEN";

/// Chunking and retry settings for a batch upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// Maximum number of records per request body.
    pub chunk_size: usize,
    /// Maximum delivery attempts per chunk, the first one included.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub retry_delay: Duration,
    /// Random jitter percentage [0, 100] added to each retry delay.
    pub jitter_percent: u8,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            max_attempts: 5,
            retry_delay: Duration::from_secs(10),
            jitter_percent: 0,
        }
    }
}

impl UploadPolicy {
    /// Reject settings that would make the upload loop degenerate.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `chunk_size` or `max_attempts` is zero, or
    /// `jitter_percent` exceeds 100.
    pub fn validate(&self) -> Result<(), KepError> {
        if self.chunk_size == 0 {
            return Err(KepError::InvalidArg("chunk_size must be at least 1".into()));
        }
        if self.max_attempts == 0 {
            return Err(KepError::InvalidArg(
                "max_attempts must be at least 1".into(),
            ));
        }
        if self.jitter_percent > 100 {
            return Err(KepError::InvalidArg(format!(
                "jitter_percent must be within [0, 100], got {}",
                self.jitter_percent
            )));
        }
        Ok(())
    }
}

/// Where and how the HTTP transport delivers chunks.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Full URL of the datapoints endpoint.
    pub url: String,
    /// Token sent in the [`API_TOKEN_HEADER`] header.
    pub token: String,
    /// Timeout applied to each POST request.
    pub timeout: Duration,
}

impl EndpointConfig {
    /// Build a config for `url` authenticated with `token`, using the default timeout.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            ..Self::default()
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            token: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
