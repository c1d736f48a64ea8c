//! CPU, memory and swap from `top`-style resource text.

use super::xml::result_text;
use super::ResponseParseError;
use crate::collection::domain::ResourceUsage;
use regex::Regex;
use std::sync::LazyLock;

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static MEMORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)MiB Mem.+?([\d.]+)\s+total.+?([\d.]+)\s+used").expect("valid memory regex")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static LOAD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"load average:\s*([\d.]+),").expect("valid load regex"));

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static SWAP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)MiB Swap.+?([\d.]+)\s+used").expect("valid swap regex"));

/// Extracts resource usage from a system resources response.
///
/// Each figure is independent; a pattern that does not match leaves its
/// field `None`.
///
/// # Errors
///
/// Returns [`ResponseParseError::MalformedXml`] when the body is not XML.
pub fn parse_resources(body: &str) -> Result<ResourceUsage, ResponseParseError> {
    let text = result_text(body)?;
    Ok(parse_resource_text(&text))
}

/// Extracts resource usage from already-unwrapped `top` output.
#[must_use]
pub fn parse_resource_text(text: &str) -> ResourceUsage {
    let memory_usage = MEMORY_PATTERN.captures(text).and_then(|captures| {
        let total = captures.get(1)?.as_str().parse::<f64>().ok()?;
        let used = captures.get(2)?.as_str().parse::<f64>().ok()?;
        memory_percentage(used, total)
    });
    ResourceUsage {
        cpu_one_min: first_number(&LOAD_PATTERN, text),
        memory_usage,
        swap_used: first_number(&SWAP_PATTERN, text),
    }
}

fn first_number(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse().ok())
}

#[expect(
    clippy::float_arithmetic,
    reason = "percentage is a ratio of two reported floats"
)]
fn memory_percentage(used: f64, total: f64) -> Option<f64> {
    if total <= 0.0 {
        return None;
    }
    let percentage = used / total * 100.0;
    Some((percentage * 100.0).round() / 100.0)
}
