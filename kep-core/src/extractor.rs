use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Frequency, KepError, Record};

/// Date window an extractor is asked to cover.
///
/// With an `end`, the window is the closed range `[start, end]`. Without one,
/// it is open-ended and begins at the start of the period (per record
/// frequency) that contains `start`, so a monthly source asked for
/// `2017-11-13` may still emit its `2017-11-01` observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// First date of interest.
    pub start: NaiveDate,
    /// Optional last date of interest (inclusive).
    pub end: Option<NaiveDate>,
    /// Suppress progress output in sources that print it.
    pub silent: bool,
}

impl ExtractRequest {
    /// Build a request, rejecting inverted windows.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `end` is before `start`.
    pub fn try_new(
        start: NaiveDate,
        end: Option<NaiveDate>,
        silent: bool,
    ) -> Result<Self, KepError> {
        if let Some(end) = end
            && end < start
        {
            return Err(KepError::InvalidArg(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end, silent })
    }

    /// Whether an observation of frequency `freq` on `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate, freq: Frequency) -> bool {
        match self.end {
            Some(end) => self.start <= date && date <= end,
            None => freq.period_start(self.start) <= date,
        }
    }

    /// Validate a record emitted by `extractor` against the window and the name rule.
    ///
    /// # Errors
    /// Returns `Data` naming the extractor and the offending record.
    pub fn check(&self, extractor: &str, rec: &Record) -> Result<(), KepError> {
        if let Err(e) = rec.validate() {
            return Err(KepError::Data(format!("{extractor}: {e}")));
        }
        if !self.contains(rec.date, rec.freq) {
            let window = self
                .end
                .map_or_else(|| format!("{}..", self.start), |end| format!("{}..={end}", self.start));
            return Err(KepError::Data(format!(
                "{extractor}: {} on {} is outside {window}",
                rec.name, rec.date
            )));
        }
        Ok(())
    }
}

/// A source of normalized records.
///
/// Implementations fetch and parse their upstream data however they like; the
/// pipeline relies only on this signature and on the [`Record`] shape. Each call
/// produces a fresh collection; nothing is cached between calls.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Stable extractor name used to tag errors and logs.
    fn name(&self) -> &'static str;

    /// Produce every record of this source inside `req`'s window.
    ///
    /// Records with a missing value are dropped by the implementation before
    /// returning.
    async fn extract(&self, req: &ExtractRequest) -> Result<Vec<Record>, KepError>;
}
