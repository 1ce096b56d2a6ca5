//! Quantities arrive from the shop floor as free text ("125", "12.5kg",
//! " 40 "). They are read the way a lenient float parser would: the longest
//! numeric prefix wins and anything unreadable counts as zero.

use serde::ser::SerializeMap;
use serde::Serializer;
use std::collections::BTreeMap;

/// Parses the leading numeric portion of `raw`, returning 0 when there is
/// none or when the result is not finite.
pub fn parse_quantity(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let text = raw.trim_start();
    let end = numeric_prefix_len(text.as_bytes());
    if end == 0 {
        return 0.0;
    }
    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Length of the longest prefix shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }

    if digits == 0 {
        return 0;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

/// Rounds to two decimal places for presentation.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// `serialize_with` helper that presents an `f64` rounded to two decimals.
pub fn serialize_round2<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(round2(*value))
}

/// Same as [`serialize_round2`] for every value of a keyed map.
pub fn serialize_round2_map<S>(
    values: &BTreeMap<String, f64>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(values.len()))?;
    for (key, value) in values {
        map.serialize_entry(key, &round2(*value))?;
    }
    map.end()
}
