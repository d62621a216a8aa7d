// Re-export helpers so tests can `use helpers::*;`
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use kep::{BatchUploader, Decimal, Frequency, NaiveDate, Record, Transport};

/// Series name used by the single-record scenarios.
pub const USDRUR: &str = "USDRUR_CB";

/// Construct a date from components for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("invalid date")
}

/// Build a daily record without unwrap noise in tests.
pub fn rec(date: NaiveDate, name: &str, value: &str) -> Record {
    Record::new(
        date,
        Frequency::Daily,
        name,
        Decimal::from_str(value).expect("invalid decimal"),
    )
    .expect("invalid record")
}

/// `n` distinct daily records: consecutive dates, value equal to the index.
pub fn records(n: usize) -> Vec<Record> {
    let start = d(2017, 1, 1);
    (0..n)
        .map(|i| {
            let date = start + chrono_days(i);
            rec(date, "SERIES", &i.to_string())
        })
        .collect()
}

fn chrono_days(i: usize) -> chrono::Duration {
    chrono::Duration::days(i64::try_from(i).expect("index fits i64"))
}

/// Uploader over `transport` with the given chunk size and attempt budget and a 10s delay.
pub fn uploader(transport: Arc<dyn Transport>, chunk_size: usize, max_attempts: u32) -> BatchUploader {
    BatchUploader::builder()
        .transport(transport)
        .chunk_size(chunk_size)
        .max_attempts(max_attempts)
        .retry_delay(Duration::from_secs(10))
        .build()
        .expect("valid uploader")
}
