//! Per-mount disk utilization from `df`-style output.

use super::xml::result_text;
use super::ResponseParseError;
use crate::collection::domain::DiskUsage;

/// Extracts disk utilization from a disk-space response.
///
/// # Errors
///
/// Returns [`ResponseParseError::MalformedXml`] when the body is not XML.
pub fn parse_disk_usage(body: &str) -> Result<DiskUsage, ResponseParseError> {
    let text = result_text(body)?;
    Ok(parse_disk_table(&text))
}

/// Extracts utilization from a raw `df` table.
///
/// Blank lines, the header, rows with fewer than six columns, and rows whose
/// second-to-last column is not `<digits>%` are skipped.
#[must_use]
pub fn parse_disk_table(text: &str) -> DiskUsage {
    let mut usage = DiskUsage::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("Filesystem") {
            continue;
        }
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < 6 {
            continue;
        }
        let mut trailing = columns.iter().rev();
        let (Some(mount), Some(percent_column)) = (trailing.next(), trailing.next()) else {
            continue;
        };
        if let Some(percent) = parse_percent(percent_column) {
            usage.insert_mount(mount, f64::from(percent));
        }
    }
    usage
}

fn parse_percent(column: &str) -> Option<u32> {
    let digits = column.strip_suffix('%')?;
    if digits.is_empty() || !digits.chars().all(|character| character.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
