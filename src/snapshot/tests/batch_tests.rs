//! Batch document parsing and record conversion tests.

use crate::collection::domain::{CertificateState, YesNo};
use crate::snapshot::domain::{BatchDocument, BatchFormatError};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 2, 0, 0, 0)
        .single()
        .expect("valid instant")
}

#[rstest]
#[case("[]", 0)]
#[case(r#"[{"serial": "0001"}, {"hostname": "fw-2"}]"#, 2)]
#[case(r#"{"devices": [{"serial": "0001"}]}"#, 1)]
fn accepted_document_shapes(#[case] json: &str, #[case] expected: usize) {
    let document = BatchDocument::parse(json).expect("document parses");
    assert_eq!(document.len(), expected);
}

#[rstest]
#[case("{not json", BatchFormatError::InvalidJson(String::new()))]
#[case(r#"{"records": []}"#, BatchFormatError::UnexpectedShape)]
#[case(r#""text""#, BatchFormatError::UnexpectedShape)]
#[case(r#"[{"serial": "0001"}, 7]"#, BatchFormatError::NonObjectRecord { index: 1 })]
fn rejected_document_shapes(#[case] json: &str, #[case] expected: BatchFormatError) {
    let error = BatchDocument::parse(json).expect_err("document is rejected");
    assert_eq!(
        std::mem::discriminant(&error),
        std::mem::discriminant(&expected)
    );
    if let BatchFormatError::NonObjectRecord { index } = expected {
        assert_eq!(error, BatchFormatError::NonObjectRecord { index });
    }
}

#[rstest]
fn loosely_typed_fields_are_coerced(now: DateTime<Utc>) {
    let json = r#"[{
        "hostname": "fw-east-1",
        "serial": 1234567,
        "ip": "10.1.0.1",
        "panorama": "east",
        "timestamp": "2026-10-01T08:00:00",
        "pan_os_version": "10.2.4",
        "cpu_one_min": "0.75",
        "memory_usage": 48.5,
        "swap_used": "n/a",
        "session_count": "1200",
        "session_max": 262142,
        "logging_service": "YES",
        "device_certificate": "yes",
        "device_cert_exp": "2027/03/01 12:00:00 PST",
        "disk_root_pct": "57",
        "disk_opt_pancfg_pct": 40,
        "disk_bogus": 1,
        "extra_column": "ignored"
    }]"#;

    let records = BatchDocument::parse(json)
        .expect("document parses")
        .into_collection_records(now);
    let record = records.first().expect("one record");

    assert_eq!(record.serial.as_deref(), Some("1234567"));
    assert_eq!(
        record.collected_at,
        Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0)
            .single()
            .expect("valid instant")
    );
    assert_eq!(record.cpu_one_min, Some(0.75));
    assert_eq!(record.memory_usage, Some(48.5));
    assert_eq!(record.swap_used, None);
    assert_eq!(record.session_count, Some(1200));
    assert_eq!(record.session_max, Some(262_142));
    assert_eq!(record.logging_service, YesNo::Yes);
    assert_eq!(record.certificate, CertificateState::Valid);
    assert_eq!(
        record.certificate_expires_at,
        Some(
            Utc.with_ymd_and_hms(2027, 3, 1, 20, 0, 0)
                .single()
                .expect("valid instant")
        )
    );
    assert!(!record.cert_timezone_assumed);
    assert_eq!(record.disks.get("disk_root_pct"), Some(57.0));
    assert_eq!(record.disks.get("disk_opt_pancfg_pct"), Some(40.0));
    assert_eq!(record.disks.len(), 2);
}

#[rstest]
fn missing_timestamp_uses_ingest_time(now: DateTime<Utc>) {
    let records = BatchDocument::parse(r#"[{"serial": "0001", "timestamp": "soon"}]"#)
        .expect("document parses")
        .into_collection_records(now);
    let record = records.first().expect("one record");

    assert_eq!(record.collected_at, now);
    assert_eq!(record.logging_service, YesNo::No);
    assert_eq!(record.certificate, CertificateState::Missing);
}

#[rstest]
fn stored_timezone_flag_is_preserved(now: DateTime<Utc>) {
    let json = r#"[{
        "serial": "0001",
        "device_certificate": "no",
        "device_cert_exp": "2027-03-01T12:00:00Z",
        "cert_timezone_assumed": "true"
    }]"#;
    let records = BatchDocument::parse(json)
        .expect("document parses")
        .into_collection_records(now);
    let record = records.first().expect("one record");

    assert_eq!(record.certificate, CertificateState::Invalid);
    assert!(record.cert_timezone_assumed);
}
