mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::{USDRUR, d, rec, uploader};
use kep::{Dataset, Frequency, KepError, from_json};
use kep_mock::{DynamicMockExtractor, DynamicMockTransport, MockBehavior, MockExtractor};

#[tokio::test]
async fn extract_keeps_extractor_order() {
    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::ust()))
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .start(d(2017, 11, 13))
        .end(d(2017, 11, 14))
        .build()
        .unwrap();

    let names: Vec<String> = ds
        .extract()
        .await
        .unwrap()
        .iter()
        .map(|r| r.name.clone())
        .collect();

    assert_eq!(
        names,
        vec![
            "UST_1YEAR",
            "UST_10YEAR",
            "UST_1YEAR",
            "UST_10YEAR",
            USDRUR,
            USDRUR
        ]
    );
}

#[tokio::test]
async fn blank_values_are_dropped_by_the_source() {
    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::brent()))
        .start(d(2017, 11, 13))
        .silent(true)
        .build()
        .unwrap();

    let items = ds.extract().await.unwrap();
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|r| r.date != d(2017, 11, 16)));
}

#[tokio::test]
async fn open_window_keeps_the_containing_period() {
    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::cpi()))
        .start(d(2017, 11, 13))
        .build()
        .unwrap();

    let items = ds.extract().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].date, d(2017, 11, 1));
    assert_eq!(items[0].freq, Frequency::Monthly);
}

#[tokio::test]
async fn extract_resets_the_collection() {
    let (ex, ctrl) = DynamicMockExtractor::new_with_controller("dyn");
    let mut ds = Dataset::builder()
        .with_extractor(ex)
        .start(d(2017, 11, 13))
        .build()
        .unwrap();

    ctrl.set_extract_behavior(MockBehavior::Return(vec![rec(d(2017, 11, 13), USDRUR, "62.22")]))
        .await;
    assert_eq!(ds.extract().await.unwrap().len(), 1);
    assert_eq!(ds.extract().await.unwrap().len(), 1);

    ctrl.set_extract_behavior(MockBehavior::Return(Vec::new())).await;
    assert!(ds.extract().await.unwrap().is_empty());
    assert!(ds.items().is_empty());

    let reqs = ctrl.extract_requests().await;
    assert_eq!(reqs.len(), 3);
    assert!(reqs.iter().all(|r| r.start == d(2017, 11, 13) && r.end.is_none()));
}

#[tokio::test]
async fn failing_extractor_aborts_and_leaves_nothing() {
    let (ex, ctrl) = DynamicMockExtractor::new_with_controller("dyn");
    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .with_extractor(Arc::new(MockExtractor::failing()))
        .with_extractor(ex)
        .start(d(2017, 11, 13))
        .build()
        .unwrap();

    let err = ds.extract().await.unwrap_err();

    assert!(matches!(err, KepError::Extractor { ref extractor, .. } if extractor == "FAIL"));
    assert!(ds.items().is_empty());
    // later extractors are never asked
    assert!(ctrl.extract_requests().await.is_empty());
}

#[tokio::test]
async fn untagged_errors_get_the_extractor_name() {
    let (ex, ctrl) = DynamicMockExtractor::new_with_controller("dyn");
    ctrl.set_extract_behavior(MockBehavior::Fail(KepError::Other("socket closed".into())))
        .await;
    let mut ds = Dataset::builder()
        .with_extractor(ex)
        .start(d(2017, 11, 13))
        .build()
        .unwrap();

    match ds.extract().await.unwrap_err() {
        KepError::Extractor { extractor, msg } => {
            assert_eq!(extractor, "dyn");
            assert!(msg.contains("socket closed"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn record_outside_window_is_a_data_error() {
    let (ex, ctrl) = DynamicMockExtractor::new_with_controller("dyn");
    ctrl.set_extract_behavior(MockBehavior::Return(vec![
        rec(d(2017, 11, 13), USDRUR, "62.22"),
        rec(d(2017, 11, 20), USDRUR, "58.80"),
    ]))
    .await;
    let mut ds = Dataset::builder()
        .with_extractor(ex)
        .start(d(2017, 11, 13))
        .end(d(2017, 11, 17))
        .build()
        .unwrap();

    match ds.extract().await.unwrap_err() {
        KepError::Data(msg) => assert!(msg.starts_with("dyn: "), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(ds.items().is_empty());
}

#[tokio::test]
async fn record_with_blank_name_is_a_data_error() {
    let (ex, ctrl) = DynamicMockExtractor::new_with_controller("dyn");
    let mut bad = rec(d(2017, 11, 13), USDRUR, "62.22");
    bad.name = "USD RUR".into();
    ctrl.set_extract_behavior(MockBehavior::Return(vec![bad])).await;
    let mut ds = Dataset::builder()
        .with_extractor(ex)
        .start(d(2017, 11, 13))
        .build()
        .unwrap();

    assert!(matches!(ds.extract().await.unwrap_err(), KepError::Data(_)));
}

#[test]
fn builder_validation() {
    let err = Dataset::builder().start(d(2017, 11, 13)).build().err().unwrap();
    assert!(matches!(err, KepError::InvalidArg(_)));

    let err = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, KepError::InvalidArg(_)));

    let err = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .start(d(2017, 11, 13))
        .end(d(2017, 11, 12))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, KepError::InvalidArg(_)));
}

#[tokio::test]
async fn to_json_uses_the_snapshot_layout() {
    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .start(d(2017, 11, 13))
        .end(d(2017, 11, 13))
        .build()
        .unwrap();
    ds.extract().await.unwrap();

    let expected = "[\n    {\n        \"date\": \"2017-11-13\",\n        \"freq\": \"d\",\n        \"name\": \"USDRUR_CB\",\n        \"value\": 62.22\n    }\n]";
    assert_eq!(ds.to_json().unwrap(), expected);
}

#[tokio::test]
async fn save_json_overwrites_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datapoints.json");
    std::fs::write(&path, "stale content that is longer than the snapshot itself ...").unwrap();

    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .start(d(2017, 11, 13))
        .build()
        .unwrap();
    ds.extract().await.unwrap();
    ds.save_json(&path).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, ds.to_json().unwrap());
    assert_eq!(from_json(&text).unwrap(), ds.items());
}

#[tokio::test]
async fn save_json_into_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("datapoints.json");
    let ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .start(d(2017, 11, 13))
        .build()
        .unwrap();

    assert!(matches!(ds.save_json(&path).await.unwrap_err(), KepError::Io(_)));
}

#[tokio::test(start_paused = true)]
async fn upload_sends_the_extracted_collection() {
    let (transport, ctrl) = DynamicMockTransport::new_with_controller("stub");
    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .with_extractor(Arc::new(MockExtractor::brent()))
        .start(d(2017, 11, 13))
        .uploader(uploader(transport, 4, 5))
        .build()
        .unwrap();
    ds.extract().await.unwrap();

    let report = ds.upload_with_report().await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.records_delivered, 9);
    assert_eq!(report.chunks_total, 3);
    let sent: Vec<_> = ctrl
        .bodies()
        .await
        .iter()
        .flat_map(|b| from_json(b).unwrap())
        .collect();
    assert_eq!(sent, ds.items());
}

#[tokio::test(start_paused = true)]
async fn upload_reports_failure_as_false() {
    let (transport, ctrl) = DynamicMockTransport::new_with_controller("stub");
    ctrl.set_default_status(500).await;
    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .start(d(2017, 11, 13))
        .silent(true)
        .uploader(uploader(transport, 1000, 2))
        .build()
        .unwrap();
    ds.extract().await.unwrap();

    assert!(!ds.upload().await.unwrap());
    assert_eq!(ctrl.post_count().await, 2);
}

#[tokio::test]
async fn silent_flag_reaches_extractors() {
    for silent in [true, false] {
        let (ex, ctrl) = DynamicMockExtractor::new_with_controller("dyn");
        let mut ds = Dataset::builder()
            .with_extractor(ex)
            .start(d(2017, 11, 13))
            .silent(silent)
            .build()
            .unwrap();
        ds.extract().await.unwrap();

        let reqs = ctrl.extract_requests().await;
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].silent, silent);
        assert_eq!(ds.request().silent, silent);
    }
}

#[tokio::test]
async fn extractors_are_loud_by_default() {
    let (ex, ctrl) = DynamicMockExtractor::new_with_controller("dyn");
    let mut ds = Dataset::builder()
        .with_extractor(ex)
        .start(d(2017, 11, 13))
        .build()
        .unwrap();
    ds.extract().await.unwrap();

    assert!(!ctrl.extract_requests().await[0].silent);
}

#[tokio::test(start_paused = true)]
async fn upload_report_carries_elapsed_time() {
    let (transport, ctrl) = DynamicMockTransport::new_with_controller("stub");
    ctrl.push_statuses(503, 2).await;
    let mut ds = Dataset::builder()
        .with_extractor(Arc::new(MockExtractor::usdrur()))
        .start(d(2017, 11, 13))
        .uploader(uploader(transport, 1000, 5))
        .build()
        .unwrap();
    ds.extract().await.unwrap();

    let report = ds.upload_with_report().await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.attempts, 3);
    assert!(report.elapsed >= Duration::from_secs(20), "{:?}", report.elapsed);
    assert!(report.elapsed < Duration::from_secs(21), "{:?}", report.elapsed);
}
