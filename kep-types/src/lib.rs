//! kep-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod record;
mod reports;

pub use config::{API_TOKEN_HEADER, DEFAULT_ENDPOINT, EndpointConfig, UploadPolicy};
pub use error::KepError;
pub use record::{Frequency, Record};
pub use reports::UploadReport;
