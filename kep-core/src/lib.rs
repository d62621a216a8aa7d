//! kep-core
//!
//! Core contracts and utilities shared across the kep pipeline.
//!
//! - `extractor`: the `Extractor` trait every data source implements, and the
//!   `ExtractRequest` window it is asked to fill.
//! - `transport`: the `Transport` capability that delivers one serialized chunk.
//! - `serialize`: record collections to and from JSON text.
//! - `chunk`: partitioning and the per-chunk delivery state machine.
//!
//! Async runtime
//! -------------
//! `Extractor` and `Transport` are `async_trait` traits. The orchestrator in
//! the `kep` crate drives them on Tokio, awaiting every call in order.
#![warn(missing_docs)]

/// Chunk partitioning and the delivery state machine.
pub mod chunk;
/// Extractor trait and request window.
pub mod extractor;
/// JSON encoding of record collections.
pub mod serialize;
/// Transport capability used by the uploader.
pub mod transport;

pub use chunk::{AttemptOutcome, ChunkState, chunk_count, partition};
pub use extractor::{ExtractRequest, Extractor};
pub use serialize::{from_json, to_json, to_json_pretty};
pub use transport::{SUCCESS_STATUS, Transport};

pub use kep_types::{
    API_TOKEN_HEADER, DEFAULT_ENDPOINT, EndpointConfig, Frequency, KepError, Record,
    UploadPolicy, UploadReport,
};

pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
