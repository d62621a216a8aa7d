use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the kep workspace.
///
/// This wraps argument validation errors, malformed source output,
/// extractor- and transport-tagged failures, and serialization or file output
/// problems. Only non-success HTTP statuses are retried by the uploader; every
/// variant here is surfaced to the caller.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KepError {
    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with records produced by a source (out of window, bad name, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// An individual extractor returned an error.
    #[error("{extractor} failed: {msg}")]
    Extractor {
        /// Extractor name that failed.
        extractor: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The transport could not complete a request (connection refused, timeout, ...).
    ///
    /// A transport that answers with a non-success status does not produce this
    /// error; it reports the status and the uploader decides whether to retry.
    #[error("transport {transport} failed: {msg}")]
    Transport {
        /// Transport name that failed.
        transport: String,
        /// Human-readable error message.
        msg: String,
    },

    /// JSON encoding or decoding failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Writing an output file failed.
    #[error("io error: {0}")]
    Io(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl KepError {
    /// Helper: build an `Extractor` error with the extractor name and message.
    pub fn extractor(extractor: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Extractor {
            extractor: extractor.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Transport` error with the transport name and message.
    pub fn transport(transport: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            transport: transport.into(),
            msg: msg.into(),
        }
    }
}

impl From<serde_json::Error> for KepError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for KepError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
