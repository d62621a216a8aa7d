use async_trait::async_trait;
use kep_core::{ExtractRequest, Extractor, KepError, Record};

mod dynamic;
mod fixtures;

pub use dynamic::{
    DynamicMockController, DynamicMockExtractor, DynamicMockTransport, MockBehavior,
    TransportBehavior,
};

/// Mock extractor for CI-safe examples. Provides deterministic records from static fixtures.
///
/// Each constructor stands in for one upstream source. Records are filtered to
/// the requested window the way a real source would.
pub struct MockExtractor {
    name: &'static str,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::usdrur()
    }
}

impl MockExtractor {
    /// Central bank USD/RUB fixing, daily.
    #[must_use]
    pub const fn usdrur() -> Self {
        Self { name: "cbr-usdrur" }
    }

    /// Brent crude price, daily, with one blank (dropped) observation.
    #[must_use]
    pub const fn brent() -> Self {
        Self { name: "brent" }
    }

    /// US Treasury yields, two maturities per day.
    #[must_use]
    pub const fn ust() -> Self {
        Self { name: "ust" }
    }

    /// Consumer price index, monthly.
    #[must_use]
    pub const fn cpi() -> Self {
        Self { name: "rosstat-cpi" }
    }

    /// A source whose every extraction fails.
    #[must_use]
    pub const fn failing() -> Self {
        Self { name: "FAIL" }
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn extract(&self, req: &ExtractRequest) -> Result<Vec<Record>, KepError> {
        let rows = fixtures::by_source(self.name)
            .ok_or_else(|| KepError::extractor(self.name, "forced failure: extract"))?;
        Ok(rows
            .into_iter()
            .filter(|r| req.contains(r.date, r.freq))
            .collect())
    }
}
