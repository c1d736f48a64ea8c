//! Normalization of vendor timestamps into canonical UTC instants.
//!
//! Appliances report time in several shapes: ISO-8601 with or without a `Z`
//! or numeric offset, and a vendor pattern `YYYY/MM/DD HH:MM:SS [TZ]` where
//! `TZ` is a North American abbreviation. Everything is reduced to a UTC
//! instant at second precision. Unparseable input yields `None`, which
//! callers treat as "field not collected".

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};

/// Canonical rendering of a normalized instant.
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Vendor wall-clock layout preceding the optional zone abbreviation.
const VENDOR_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const ISO_OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const ISO_NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// How explicit zone information in the input is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimezonePolicy {
    /// Honour explicit offsets and zone abbreviations.
    #[default]
    Detect,
    /// The wall-clock value is already UTC; offsets and abbreviations are
    /// ignored.
    KnownUtc,
}

/// Successfully normalized timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    instant: DateTime<Utc>,
    timezone_assumed: bool,
}

impl NormalizedTimestamp {
    const fn exact(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            timezone_assumed: false,
        }
    }

    /// Returns the UTC instant truncated to whole seconds.
    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Returns `true` when the input carried an unrecognized zone
    /// abbreviation and the clock value was taken as UTC.
    #[must_use]
    pub const fn timezone_assumed(&self) -> bool {
        self.timezone_assumed
    }

    /// Renders the instant as `YYYY-MM-DDTHH:MM:SSZ`.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        format_canonical(self.instant)
    }
}

/// Renders a UTC instant as `YYYY-MM-DDTHH:MM:SSZ`.
#[must_use]
pub fn format_canonical(instant: DateTime<Utc>) -> String {
    instant.format(CANONICAL_FORMAT).to_string()
}

/// Normalizes a free-text timestamp to a UTC instant.
///
/// Never fails loudly: empty or unparseable input returns `None`.
///
/// # Examples
///
/// ```
/// use panmetrics::collection::domain::{normalize_timestamp, TimezonePolicy};
///
/// let normalized = normalize_timestamp("2025/01/10 08:00:00 PST", TimezonePolicy::Detect)
///     .map(|value| value.to_canonical_string());
/// assert_eq!(normalized.as_deref(), Some("2025-01-10T16:00:00Z"));
/// ```
#[must_use]
pub fn normalize_timestamp(raw: &str, policy: TimezonePolicy) -> Option<NormalizedTimestamp> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_iso(trimmed, policy)
        .or_else(|| parse_vendor(trimmed, policy))
        .map(|normalized| NormalizedTimestamp {
            instant: normalized.instant.trunc_subsecs(0),
            ..normalized
        })
}

fn parse_iso(value: &str, policy: TimezonePolicy) -> Option<NormalizedTimestamp> {
    let without_marker = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .unwrap_or(value);

    let with_offset = ISO_OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::<FixedOffset>::parse_from_str(without_marker, format).ok());
    if let Some(parsed) = with_offset {
        let instant = match policy {
            TimezonePolicy::Detect => parsed.with_timezone(&Utc),
            TimezonePolicy::KnownUtc => parsed.naive_local().and_utc(),
        };
        return Some(NormalizedTimestamp::exact(instant));
    }

    ISO_NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(without_marker, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(without_marker, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| NormalizedTimestamp::exact(naive.and_utc()))
}

fn parse_vendor(value: &str, policy: TimezonePolicy) -> Option<NormalizedTimestamp> {
    let mut tokens = value.split_whitespace();
    let date = tokens.next()?;
    let time = tokens.next()?;
    let zone = tokens.next();
    if tokens.next().is_some() {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(&format!("{date} {time}"), VENDOR_FORMAT).ok()?;
    let Some(abbreviation) = zone else {
        return Some(NormalizedTimestamp::exact(naive.and_utc()));
    };
    if !abbreviation.chars().all(|character| character.is_ascii_alphabetic()) {
        return None;
    }
    if policy == TimezonePolicy::KnownUtc {
        return Some(NormalizedTimestamp::exact(naive.and_utc()));
    }

    match abbreviation_offset_hours(abbreviation) {
        Some(hours) => {
            let offset = FixedOffset::east_opt(hours * 3600)?;
            let local = offset.from_local_datetime(&naive).single()?;
            Some(NormalizedTimestamp::exact(local.with_timezone(&Utc)))
        }
        None => Some(NormalizedTimestamp {
            instant: naive.and_utc(),
            timezone_assumed: true,
        }),
    }
}

/// Offset from UTC in whole hours for the zone abbreviations appliances emit.
fn abbreviation_offset_hours(abbreviation: &str) -> Option<i32> {
    let offset = match abbreviation.to_ascii_uppercase().as_str() {
        "UTC" | "GMT" => 0,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" | "AKDT" => -8,
        "AKST" | "HDT" => -9,
        "HST" => -10,
        _ => return None,
    };
    Some(offset)
}

/// Serde helpers rendering instants in canonical form.
pub mod canonical_utc {
    use super::format_canonical;
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    /// Serializes an instant as `YYYY-MM-DDTHH:MM:SSZ`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_canonical(*instant))
    }

    /// Optional-instant variant; `None` renders as an empty string.
    pub mod option {
        use super::format_canonical;
        use chrono::{DateTime, Utc};
        use serde::Serializer;

        /// Serializes an optional instant, using `""` for `None`.
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S>(
            instant: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match instant {
                Some(value) => serializer.serialize_str(&format_canonical(*value)),
                None => serializer.serialize_str(""),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn canonical(raw: &str, policy: TimezonePolicy) -> Option<String> {
        normalize_timestamp(raw, policy).map(|value| value.to_canonical_string())
    }

    #[rstest]
    #[case("2025-01-10T08:00:00Z")]
    #[case("2025-01-10T08:00:00")]
    #[case("2025-01-10T08:00:00+00:00")]
    #[case("2025-01-10 08:00:00")]
    #[case("2025-01-10T08:00:00.987654Z")]
    fn iso_marker_presence_does_not_change_instant(#[case] raw: &str) {
        assert_eq!(
            canonical(raw, TimezonePolicy::Detect).as_deref(),
            Some("2025-01-10T08:00:00Z")
        );
    }

    #[test]
    fn iso_offset_is_converted_to_utc() {
        assert_eq!(
            canonical("2025-01-10T08:00:00-05:00", TimezonePolicy::Detect).as_deref(),
            Some("2025-01-10T13:00:00Z")
        );
    }

    #[test]
    fn known_utc_policy_keeps_wall_clock() {
        assert_eq!(
            canonical("2025-01-10T08:00:00-05:00", TimezonePolicy::KnownUtc).as_deref(),
            Some("2025-01-10T08:00:00Z")
        );
        assert_eq!(
            canonical("2025/01/10 08:00:00 PST", TimezonePolicy::KnownUtc).as_deref(),
            Some("2025-01-10T08:00:00Z")
        );
    }

    #[rstest]
    #[case("2025/01/10 08:00:00 PST", "2025-01-10T16:00:00Z")]
    #[case("2025/01/10 08:00:00 PDT", "2025-01-10T15:00:00Z")]
    #[case("2025/01/10 08:00:00 EST", "2025-01-10T13:00:00Z")]
    #[case("2025/01/10 08:00:00 edt", "2025-01-10T12:00:00Z")]
    #[case("2025/01/10 08:00:00 AKST", "2025-01-10T17:00:00Z")]
    #[case("2025/01/10 08:00:00 HST", "2025-01-10T18:00:00Z")]
    #[case("2025/01/10 08:00:00 GMT", "2025-01-10T08:00:00Z")]
    #[case("2025/01/10 08:00:00", "2025-01-10T08:00:00Z")]
    #[case("2025/12/31 23:30:00 CST", "2026-01-01T05:30:00Z")]
    fn vendor_format_converts_known_zones(#[case] raw: &str, #[case] expected: &str) {
        let normalized =
            normalize_timestamp(raw, TimezonePolicy::Detect).expect("vendor timestamp parses");
        assert_eq!(normalized.to_canonical_string(), expected);
        assert!(!normalized.timezone_assumed());
    }

    #[test]
    fn unknown_abbreviation_is_taken_as_utc_and_flagged() {
        let normalized = normalize_timestamp("2025/01/10 08:00:00 CET", TimezonePolicy::Detect)
            .expect("unknown zone still parses");
        assert_eq!(normalized.to_canonical_string(), "2025-01-10T08:00:00Z");
        assert!(normalized.timezone_assumed());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("not a date")]
    #[case("2025/13/40 08:00:00 UTC")]
    #[case("2025/01/10 08:00:00 UTC extra")]
    #[case("2025/01/10 08:00:00 +0100")]
    fn unparseable_input_yields_none(#[case] raw: &str) {
        assert_eq!(normalize_timestamp(raw, TimezonePolicy::Detect), None);
    }
}
