//! kep collects economic time series and delivers them to a datapoints API.
//!
//! Overview
//! - Runs a list of [`Extractor`]s over one date window and concatenates their
//!   records, in registration order, into a [`Dataset`].
//! - Serializes the collection to JSON for file snapshots or request bodies.
//! - Uploads the collection through a [`BatchUploader`] that splits it into
//!   fixed-size chunks and retries rejected chunks a bounded number of times.
//!
//! Key behaviors and trade-offs
//! - Extraction is fail-fast: the first failing source aborts the whole run and
//!   leaves the dataset empty, so no partial dataset can be uploaded.
//! - Delivery is serial and at-least-once: chunks go out strictly in order, and
//!   chunks already acknowledged are not rolled back when a later chunk runs
//!   out of attempts. Retried POSTs carry no deduplication key.
//! - Only a non-200 status is retried. A transport that cannot complete a
//!   request at all (connection refused, timeout) aborts immediately.
//! - Decimal values become JSON numbers, which goes through `f64`; precision
//!   beyond double is lost at the wire.
//!
//! Examples
//! Building a dataset and uploading it:
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use kep::{BatchUploader, Dataset, EndpointConfig, NaiveDate};
//!
//! let uploader = BatchUploader::builder()
//!     .endpoint(EndpointConfig::new("https://example.org/api/datapoints", "token"))
//!     .chunk_size(1000)
//!     .max_attempts(5)
//!     .retry_delay(Duration::from_secs(10))
//!     .build()?;
//!
//! let mut ds = Dataset::builder()
//!     .with_extractor(Arc::new(UsdRur::default()))
//!     .with_extractor(Arc::new(Brent::default()))
//!     .start(NaiveDate::from_ymd_opt(2017, 11, 13).unwrap())
//!     .uploader(uploader)
//!     .build()?;
//!
//! ds.extract().await?;
//! ds.save_json("datapoints.json").await?;
//! let delivered = ds.upload().await?;
//! ```
//!
//! See `kep/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

mod backoff;
mod dataset;
mod timer;
mod transport;
mod uploader;

pub use backoff::retry_wait;
pub use dataset::{Dataset, DatasetBuilder};
pub use timer::Timer;
pub use transport::HttpTransport;
pub use uploader::{BatchUploader, BatchUploaderBuilder};

// Re-export core types for convenience
pub use kep_core::{
    API_TOKEN_HEADER, DEFAULT_ENDPOINT, Decimal, EndpointConfig, ExtractRequest, Extractor,
    Frequency, KepError, NaiveDate, Record, SUCCESS_STATUS, Transport, UploadPolicy,
    UploadReport, from_json, to_json, to_json_pretty,
};
