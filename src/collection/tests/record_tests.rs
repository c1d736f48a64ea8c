//! Collection record merge and serialization tests.

use super::fixtures::descriptor;
use crate::collection::domain::{
    CertificateState, CertificateStatus, CollectionRecord, DiskUsage, RecordPatch, ResourceUsage,
    SessionLoad, SystemIdentity, YesNo,
};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn instant(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, hour, minute, second)
        .single()
        .expect("valid instant")
}

#[fixture]
fn record() -> CollectionRecord {
    CollectionRecord::from_descriptor(&descriptor("0001", Some("10.1.0.1")), instant(8, 0, 0))
}

#[rstest]
fn descriptor_fields_seed_the_record(record: CollectionRecord) {
    assert_eq!(record.serial.as_deref(), Some("0001"));
    assert_eq!(record.hostname.as_deref(), Some("fw-0001"));
    assert_eq!(record.address.as_deref(), Some("10.1.0.1"));
    assert_eq!(record.management_node.as_deref(), Some("east"));
    assert_eq!(record.model.as_deref(), Some("PA-3220"));
    assert_eq!(record.logging_service, YesNo::No);
    assert_eq!(record.certificate, CertificateState::Missing);
    assert!(record.disks.is_empty());
}

#[rstest]
fn absent_patch_fields_keep_existing_values(mut record: CollectionRecord) {
    record.apply(
        SessionLoad {
            active: Some(10),
            capacity: Some(100),
        }
        .into(),
    );
    record.apply(
        SessionLoad {
            active: Some(12),
            capacity: None,
        }
        .into(),
    );
    record.apply(
        SystemIdentity {
            software_version: Some(String::from("11.0.1")),
            model: None,
        }
        .into(),
    );

    assert_eq!(record.session_count, Some(12));
    assert_eq!(record.session_max, Some(100));
    assert_eq!(record.software_version.as_deref(), Some("11.0.1"));
    assert_eq!(record.model.as_deref(), Some("PA-3220"));
}

#[rstest]
fn disk_patches_merge_by_key(mut record: CollectionRecord) {
    let mut first = DiskUsage::new();
    first.insert_mount("/", 50.0);
    first.insert_mount("/opt/pancfg", 10.0);
    let mut second = DiskUsage::new();
    second.insert_mount("/", 55.0);

    record.apply(first.into());
    record.apply(second.into());

    assert_eq!(record.disks.get("disk_root_pct"), Some(55.0));
    assert_eq!(record.disks.get("disk_opt_pancfg_pct"), Some(10.0));
}

#[rstest]
fn certificate_patch_replaces_state_and_expiry_together(mut record: CollectionRecord) {
    record.apply(
        CertificateStatus {
            state: CertificateState::Valid,
            expires_at: Some(instant(12, 0, 0)),
            timezone_assumed: true,
        }
        .into(),
    );
    record.apply(CertificateStatus::default().into());

    assert_eq!(record.certificate, CertificateState::Missing);
    assert_eq!(record.certificate_expires_at, None);
    assert!(!record.cert_timezone_assumed);
}

#[rstest]
fn empty_patch_changes_nothing(mut record: CollectionRecord) {
    let before = record.clone();
    record.apply(RecordPatch::default());
    assert_eq!(record, before);
}

#[test]
fn collected_at_is_truncated_to_seconds() {
    let precise = instant(8, 0, 0) + chrono::TimeDelta::milliseconds(750);
    assert_eq!(CollectionRecord::empty(precise).collected_at, instant(8, 0, 0));
}

#[rstest]
#[case(Some("0001"), Some("fw-1"), Some("0001"))]
#[case(Some("  "), Some("fw-1"), Some("fw-1"))]
#[case(None, Some("fw-1"), Some("fw-1"))]
#[case(None, None, None)]
fn identifier_prefers_serial(
    #[case] serial: Option<&str>,
    #[case] hostname: Option<&str>,
    #[case] expected: Option<&str>,
) {
    let mut record = CollectionRecord::empty(instant(8, 0, 0));
    record.serial = serial.map(str::to_owned);
    record.hostname = hostname.map(str::to_owned);
    assert_eq!(record.identifier(), expected);
}

#[rstest]
fn serialized_record_uses_batch_field_names(mut record: CollectionRecord) {
    record.apply(
        ResourceUsage {
            cpu_one_min: Some(0.5),
            memory_usage: None,
            swap_used: None,
        }
        .into(),
    );
    let mut disks = DiskUsage::new();
    disks.insert_mount("/", 57.0);
    record.apply(disks.into());

    let value = serde_json::to_value(&record).expect("record serializes");

    assert_eq!(value.get("ip"), Some(&json!("10.1.0.1")));
    assert_eq!(value.get("panorama"), Some(&json!("east")));
    assert_eq!(value.get("timestamp"), Some(&json!("2026-10-01T08:00:00Z")));
    assert_eq!(value.get("pan_os_version"), Some(&Value::Null));
    assert_eq!(value.get("cpu_one_min"), Some(&json!(0.5)));
    assert_eq!(value.get("logging_service"), Some(&json!("no")));
    assert_eq!(value.get("device_certificate"), Some(&json!("")));
    assert_eq!(value.get("device_cert_exp"), Some(&json!("")));
    assert_eq!(value.get("disk_root_pct"), Some(&json!(57.0)));
    assert!(value.get("disks").is_none());
}
