use std::sync::Arc;
use std::time::Duration;

use kep::{BatchUploader, Dataset, NaiveDate};
use kep_mock::{DynamicMockTransport, MockExtractor};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,kep=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    // Scripted endpoint: the first chunk is rejected twice before it goes through
    let (transport, ctrl) = DynamicMockTransport::new_with_controller("mock-endpoint");
    ctrl.push_statuses(503, 2).await;

    let uploader = BatchUploader::builder()
        .transport(transport)
        .chunk_size(5)
        .max_attempts(3)
        .retry_delay(Duration::from_millis(200))
        .build()?;

    let start = NaiveDate::from_ymd_opt(2017, 11, 13).ok_or("invalid start date")?;
    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .with_extractor(Arc::new(MockExtractor::brent()))
        .with_extractor(Arc::new(MockExtractor::ust()))
        .with_extractor(Arc::new(MockExtractor::cpi()))
        .start(start)
        .uploader(uploader)
        .build()?;

    let items = ds.extract().await?;
    println!("extracted {} datapoints", items.len());

    let report = ds.upload_with_report().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
