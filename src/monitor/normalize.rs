//! The machine agent only accepts integer magnitudes. Plain decimals are
//! scaled by 100 and the metric name is marked so readers know the factor.

use std::sync::LazyLock;

use regex::Regex;

use super::report::{MetricValue, OutputMetric};

pub const SCALED_SUFFIX: &str = " (x100)";

static DECIMAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("decimal pattern compiles"));

/// `digits.digits`, no sign and no exponent.
pub fn is_decimal_number(candidate: &str) -> bool {
    DECIMAL_NUMBER.is_match(candidate)
}

/// Multiply a plain decimal by 100 and truncate. The scaling is done on the
/// digits so `12.34` gives exactly `1234`.
pub fn decimal_to_scaled(decimal: &str) -> i64 {
    let (integral, fraction) = decimal.split_once('.').unwrap_or((decimal, ""));
    let mut digits = String::with_capacity(integral.len() + 2);
    digits.push_str(integral);
    digits.extend(fraction.chars().chain(std::iter::repeat('0')).take(2));
    digits.parse().unwrap_or_else(|_| {
        // too large for i64, saturate like a float cast would
        let value: f64 = decimal.parse().unwrap_or(0.0);
        (value * 100.0) as i64
    })
}

/// `"5.0"` is emitted as `"5"`.
pub fn strip_trailing_zero(value: &str) -> &str {
    match value.strip_suffix(".0") {
        Some(stripped) if stripped.ends_with(|c: char| c.is_ascii_digit()) => stripped,
        _ => value,
    }
}

/// Apply the decimal scaling to a metric about to be reported.
pub fn normalize(metric: OutputMetric) -> OutputMetric {
    match &metric.value {
        MetricValue::Text(text) if is_decimal_number(text) => OutputMetric {
            value: MetricValue::Integer(decimal_to_scaled(text)),
            path: metric.path + SCALED_SUFFIX,
            ..metric
        },
        _ => metric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_detection() {
        assert!(is_decimal_number("12.34"));
        assert!(is_decimal_number("0.5"));
        assert!(!is_decimal_number("7"));
        assert!(!is_decimal_number("1.0e3"));
        assert!(!is_decimal_number("-1.5"));
        assert!(!is_decimal_number(".5"));
        assert!(!is_decimal_number("5."));
    }

    #[test]
    fn scaling_truncates_to_two_digits() {
        assert_eq!(decimal_to_scaled("12.34"), 1234);
        assert_eq!(decimal_to_scaled("1.15"), 115);
        assert_eq!(decimal_to_scaled("0.5"), 50);
        assert_eq!(decimal_to_scaled("3.14159"), 314);
        assert_eq!(decimal_to_scaled("99999999999999999999.5"), i64::MAX);
    }

    #[test]
    fn trailing_zero() {
        assert_eq!(strip_trailing_zero("5.0"), "5");
        assert_eq!(strip_trailing_zero("10.0"), "10");
        assert_eq!(strip_trailing_zero("5.05"), "5.05");
        assert_eq!(strip_trailing_zero("1.00"), "1.00");
        assert_eq!(strip_trailing_zero(".0"), ".0");
        assert_eq!(strip_trailing_zero("7"), "7");
    }

    #[test]
    fn normalize_marks_scaled_metrics() {
        let metric = normalize(OutputMetric::current("a|b", MetricValue::Text("12.34".into())));
        assert_eq!(metric.path, "a|b (x100)");
        assert_eq!(metric.value, MetricValue::Integer(1234));

        for untouched in ["7", "1.0e3", "-2.5"] {
            let metric = normalize(OutputMetric::current("a|b", MetricValue::Text(untouched.into())));
            assert_eq!(metric.path, "a|b");
            assert_eq!(metric.value, MetricValue::Text(untouched.into()));
        }

        let metric = normalize(OutputMetric::current("count", MetricValue::Integer(3)));
        assert_eq!(metric.path, "count");
    }
}
