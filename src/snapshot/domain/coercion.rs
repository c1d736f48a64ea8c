//! Lenient conversion of loosely typed JSON values.
//!
//! Batch files come from other tools and older collector versions, so
//! numbers may arrive as strings. Anything that does not convert is `None`.

use serde_json::Value;

/// Reads a float from a number or a numeric string.
#[must_use]
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|parsed| parsed.is_finite()),
        _ => None,
    }
}

/// Reads a non-negative integer from a number or a numeric string.
#[must_use]
pub fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Reads a non-empty string; numbers are rendered as text.
#[must_use]
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Reads a boolean from `true`/`false` or their string forms.
#[must_use]
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => text.trim().parse::<bool>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(1.5), Some(1.5))]
    #[case(json!(3), Some(3.0))]
    #[case(json!(" 42.25 "), Some(42.25))]
    #[case(json!(""), None)]
    #[case(json!("n/a"), None)]
    #[case(json!(null), None)]
    #[case(json!(true), None)]
    fn floats_coerce_leniently(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(coerce_f64(&value), expected);
    }

    #[rstest]
    #[case(json!(120), Some(120))]
    #[case(json!("64000"), Some(64_000))]
    #[case(json!(-1), None)]
    #[case(json!("many"), None)]
    fn counts_coerce_leniently(#[case] value: Value, #[case] expected: Option<u64>) {
        assert_eq!(coerce_u64(&value), expected);
    }

    #[test]
    fn blank_strings_are_absent() {
        assert_eq!(coerce_string(&json!("   ")), None);
        assert_eq!(coerce_string(&json!(" fw-01 ")).as_deref(), Some("fw-01"));
    }
}
