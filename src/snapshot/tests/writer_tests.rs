//! Snapshot writer tests against the in-memory repository.

use std::sync::Arc;

use crate::collection::domain::CollectionRecord;
use crate::snapshot::{
    adapters::memory::InMemorySnapshotRepository,
    domain::{ApplianceId, StoreOutcome},
    ports::SnapshotRepository,
    services::{PersistSummary, SnapshotWriter, SnapshotWriterError},
};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

type TestWriter = SnapshotWriter<InMemorySnapshotRepository>;

#[fixture]
fn writer() -> TestWriter {
    SnapshotWriter::new(Arc::new(InMemorySnapshotRepository::new()))
}

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 8, minute, 0)
        .single()
        .expect("valid instant")
}

fn record(serial: Option<&str>, hostname: Option<&str>, minute: u32) -> CollectionRecord {
    let mut record = CollectionRecord::empty(at(minute));
    record.serial = serial.map(str::to_owned);
    record.hostname = hostname.map(str::to_owned);
    record.software_version = Some(format!("10.2.{minute}"));
    record
}

fn id(value: &str) -> ApplianceId {
    ApplianceId::new(value).expect("valid id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_instant_is_ignored(writer: TestWriter) {
    let first = writer
        .persist_one(&record(Some("0001"), Some("fw-1"), 0))
        .await
        .expect("first store succeeds");
    let mut repeat = record(Some("0001"), Some("fw-1"), 0);
    repeat.software_version = Some(String::from("11.0.0"));
    let second = writer
        .persist_one(&repeat)
        .await
        .expect("duplicate is not an error");

    assert_eq!(first, StoreOutcome::Inserted);
    assert_eq!(second, StoreOutcome::DuplicateIgnored);
    let stored = writer
        .repository()
        .find_appliance(&id("0001"))
        .await
        .expect("lookup succeeds")
        .expect("appliance stored");
    assert_eq!(stored.software_version(), Some("10.2.0"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn later_snapshots_update_the_appliance(writer: TestWriter) {
    writer
        .persist(&[
            record(Some("0001"), Some("fw-1"), 0),
            record(Some("0001"), None, 5),
        ])
        .await;

    let repository = writer.repository();
    let stored = repository
        .find_appliance(&id("0001"))
        .await
        .expect("lookup succeeds")
        .expect("appliance stored");
    assert_eq!(stored.software_version(), Some("10.2.5"));
    assert_eq!(stored.hostname(), Some("fw-1"));

    let history = repository
        .snapshots_for(&id("0001"))
        .await
        .expect("history loads");
    let instants: Vec<_> = history.iter().map(|snapshot| snapshot.collected_at()).collect();
    assert_eq!(instants, vec![at(0), at(5)]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn records_without_identity_are_skipped(writer: TestWriter) {
    let result = writer.persist_one(&record(None, None, 0)).await;
    assert!(matches!(result, Err(SnapshotWriterError::MissingIdentifier)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hostname_keys_serial_less_appliances(writer: TestWriter) {
    writer
        .persist_one(&record(None, Some("fw-lab"), 0))
        .await
        .expect("hostname-keyed store succeeds");

    let stored = writer
        .repository()
        .find_appliance(&id("fw-lab"))
        .await
        .expect("lookup succeeds");
    assert!(stored.is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_summary_counts_each_outcome(writer: TestWriter) {
    let summary = writer
        .persist(&[
            record(Some("0001"), None, 0),
            record(Some("0001"), None, 0),
            record(None, None, 0),
            record(Some("0002"), None, 0),
        ])
        .await;

    assert_eq!(
        summary,
        PersistSummary {
            inserted: 2,
            duplicates: 1,
            skipped: 1,
            failed: 0,
        }
    );
    assert_eq!(summary.total(), 4);
    assert_eq!(
        writer.repository().snapshot_count().expect("count snapshots"),
        2
    );
}
