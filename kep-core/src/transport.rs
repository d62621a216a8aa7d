use async_trait::async_trait;

use crate::KepError;

/// The only status the datapoints endpoint uses to acknowledge a chunk.
pub const SUCCESS_STATUS: u16 = 200;

/// Delivers one serialized chunk to the remote endpoint.
///
/// `Ok(status)` means the endpoint answered; any status other than
/// [`SUCCESS_STATUS`] is treated as a transient failure and retried by the
/// uploader. `Err` means the request could not be completed at all and aborts
/// the upload without retrying.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Stable transport name used to tag errors and logs.
    fn name(&self) -> &'static str;

    /// POST a JSON array body and return the HTTP status code.
    async fn post(&self, body: &str) -> Result<u16, KepError>;
}
