use std::path::Path;
use std::sync::Arc;

use kep_core::{
    ExtractRequest, Extractor, KepError, NaiveDate, Record, UploadReport, to_json_pretty,
};

use crate::uploader::BatchUploader;

/// Builder for [`Dataset`].
#[derive(Default)]
pub struct DatasetBuilder {
    extractors: Vec<Arc<dyn Extractor>>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    silent: bool,
    uploader: Option<BatchUploader>,
}

impl DatasetBuilder {
    /// Create a new builder with no extractors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor. Extractors run in registration order.
    #[must_use]
    pub fn with_extractor(mut self, e: Arc<dyn Extractor>) -> Self {
        self.extractors.push(e);
        self
    }

    /// First date of the extraction window.
    #[must_use]
    pub const fn start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Last date of the extraction window (inclusive). Open-ended when unset.
    #[must_use]
    pub const fn end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Suppress upload summaries and ask extractors to stay quiet.
    #[must_use]
    pub const fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Uploader used by [`Dataset::upload`]. Defaults to
    /// `BatchUploader::builder().build()`.
    #[must_use]
    pub fn uploader(mut self, uploader: BatchUploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Build the dataset.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no extractor is registered, no start date is set,
    /// or the end date precedes the start date. Errors from building the
    /// default uploader are propagated.
    pub fn build(self) -> Result<Dataset, KepError> {
        if self.extractors.is_empty() {
            return Err(KepError::InvalidArg(
                "no extractors registered; add at least one via with_extractor(...)".to_string(),
            ));
        }
        let Some(start) = self.start else {
            return Err(KepError::InvalidArg(
                "start date is required; set it via start(...)".to_string(),
            ));
        };
        let request = ExtractRequest::try_new(start, self.end, self.silent)?;
        let uploader = match self.uploader {
            Some(u) => u,
            None => BatchUploader::builder().build()?,
        };
        Ok(Dataset {
            extractors: self.extractors,
            request,
            uploader,
            items: Vec::new(),
        })
    }
}

/// Keep extractor-attributed errors as they are; tag anything else with the extractor name.
fn tag_err(extractor: &str, e: KepError) -> KepError {
    match e {
        e @ (KepError::Extractor { .. } | KepError::Data(_)) => e,
        other => KepError::Extractor {
            extractor: extractor.to_string(),
            msg: other.to_string(),
        },
    }
}

/// Records collected from a fixed list of extractors over one date window.
pub struct Dataset {
    extractors: Vec<Arc<dyn Extractor>>,
    request: ExtractRequest,
    uploader: BatchUploader,
    items: Vec<Record>,
}

impl Dataset {
    /// Start building a new dataset.
    ///
    /// ```rust,ignore
    /// let mut ds = kep::Dataset::builder()
    ///     .with_extractor(usdrur.clone())
    ///     .with_extractor(brent.clone())
    ///     .start(NaiveDate::from_ymd_opt(2017, 11, 13).unwrap())
    ///     .silent(true)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::new()
    }

    /// Window passed to every extractor.
    #[must_use]
    pub const fn request(&self) -> &ExtractRequest {
        &self.request
    }

    /// Records from the last successful [`extract`](Self::extract).
    #[must_use]
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Run every extractor in order and replace the collection with their output.
    ///
    /// The collection is cleared first. Any failure stops the run and leaves it
    /// empty, so a later upload never sends a partial dataset.
    ///
    /// # Errors
    /// Returns the first extractor error, tagged with the extractor name, or a
    /// `Data` error for a record outside the window or with an invalid name.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kep::dataset::extract",
            skip(self),
            fields(extractors = self.extractors.len(), start = %self.request.start),
        )
    )]
    pub async fn extract(&mut self) -> Result<&[Record], KepError> {
        self.items.clear();
        let mut items = Vec::new();
        for ex in &self.extractors {
            let name = ex.name();
            let batch = ex
                .extract(&self.request)
                .await
                .map_err(|e| tag_err(name, e))?;
            for rec in &batch {
                self.request.check(name, rec)?;
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(extractor = name, records = batch.len(), "extracted");
            items.extend(batch);
        }
        self.items = items;
        Ok(&self.items)
    }

    /// Current collection in the snapshot format.
    ///
    /// # Errors
    /// Returns `Serialization` if a value has no finite `f64` form.
    pub fn to_json(&self) -> Result<String, KepError> {
        to_json_pretty(&self.items)
    }

    /// Write [`to_json`](Self::to_json) to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns `Serialization` or `Io`.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), KepError> {
        let text = self.to_json()?;
        tokio::fs::write(path, text).await?;
        Ok(())
    }

    /// Upload the collection; `true` if every chunk was acknowledged.
    ///
    /// # Errors
    /// See [`BatchUploader::upload`].
    pub async fn upload(&self) -> Result<bool, KepError> {
        Ok(self.upload_with_report().await?.is_success())
    }

    /// Upload the collection and describe what was delivered.
    ///
    /// # Errors
    /// See [`BatchUploader::upload`].
    pub async fn upload_with_report(&self) -> Result<UploadReport, KepError> {
        let report = self.uploader.upload_with_report(&self.items).await?;
        #[cfg(feature = "tracing")]
        if !self.request.silent {
            tracing::info!(
                records = self.items.len(),
                delivered = report.records_delivered,
                success = report.is_success(),
                "{:5} datapoints uploaded in {:.2} sec",
                self.items.len(),
                report.elapsed.as_secs_f64()
            );
        }
        Ok(report)
    }
}
