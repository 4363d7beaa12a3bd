//! Encoders for literal values.
//!
//! Numbers arrive as raw source text and are evaluated here. JavaScript has a
//! single number type, so values that are integral are emitted as JSON
//! integers (`2.0` becomes `2`) and everything else as a float.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde_json::{Number, Value};

use crate::error::{TransformError, TransformResult};

static HEXADECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0[xX]([0-9a-fA-F](?:_?[0-9a-fA-F])*)$").expect("valid hexadecimal pattern")
});

static BINARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[bB]([01](?:_?[01])*)$").expect("valid binary pattern"));

static OCTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[oO]([0-7](?:_?[0-7])*)$").expect("valid octal pattern"));

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d(?:_?\d)*(?:\.(?:\d(?:_?\d)*)?)?|\.\d(?:_?\d)*)(?:[eE][+-]?\d(?:_?\d)*)?$")
        .expect("valid decimal pattern")
});

/// `017`, `00.5`, `0_1`: rejected in strict mode JavaScript.
static LEGACY_OCTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[\d_]").expect("valid legacy octal pattern"));

const REGEX_FLAGS: &str = "dgimsuyv";

/// 2^53, the end of the range where every integer is exactly representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Evaluate a numeric literal to its base-10 value.
pub fn encode_number(raw: &str) -> TransformResult<Value> {
    parse_number(raw).map(Value::Number)
}

/// Evaluate `-<raw>`.
pub(crate) fn encode_negated_number(raw: &str) -> TransformResult<Value> {
    let number = parse_number(raw)?;
    negate(&number)
        .map(Value::Number)
        .ok_or_else(|| malformed_number(raw, "value is out of range"))
}

/// Encode a regular expression literal as `[pattern, flags]`.
pub fn encode_regex(pattern: &str, flags: &str) -> TransformResult<Value> {
    let malformed = |reason: String| TransformError::MalformedLiteral {
        kind: "regular expression",
        raw: format!("/{}/{}", pattern, flags),
        reason,
    };

    for (index, flag) in flags.char_indices() {
        if !REGEX_FLAGS.contains(flag) {
            return Err(malformed(format!("unknown flag '{}'", flag)));
        }
        if flags[..index].contains(flag) {
            return Err(malformed(format!("duplicate flag '{}'", flag)));
        }
    }
    if flags.contains('u') && flags.contains('v') {
        return Err(malformed("flags 'u' and 'v' cannot be combined".to_string()));
    }

    Ok(Value::Array(vec![
        Value::String(pattern.to_string()),
        Value::String(flags.to_string()),
    ]))
}

fn parse_number(raw: &str) -> TransformResult<Number> {
    for (pattern, radix) in [(&*HEXADECIMAL, 16), (&*BINARY, 2), (&*OCTAL, 8)] {
        if let Some(captures) = pattern.captures(raw) {
            let digits = captures[1].replace('_', "");
            return radix_value(&digits, radix)
                .ok_or_else(|| malformed_number(raw, "value is out of range"));
        }
    }

    if raw.ends_with('n') {
        return Err(malformed_number(raw, "BigInt literals are not supported"));
    }
    if LEGACY_OCTAL.is_match(raw) {
        return Err(malformed_number(raw, "legacy octal literals are not allowed"));
    }
    if !DECIMAL.is_match(raw) {
        return Err(malformed_number(raw, "not a valid number"));
    }

    decimal_value(&raw.replace('_', ""))
        .ok_or_else(|| malformed_number(raw, "value is out of range"))
}

fn radix_value(digits: &str, radix: u32) -> Option<Number> {
    match u64::from_str_radix(digits, radix) {
        Ok(value) => Some(Number::from(value)),
        Err(_) => {
            // Too large for u64; JavaScript rounds to the nearest double
            let value = digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0f64, |acc, digit| acc * f64::from(radix) + f64::from(digit));
            Number::from_f64(value)
        }
    }
}

fn decimal_value(cleaned: &str) -> Option<Number> {
    let normalized = normalize_decimal(cleaned);
    let value: f64 = normalized.parse().ok()?;

    match exact_decimal(&normalized) {
        Some(decimal) if decimal.fract().is_zero() => decimal
            .to_u64()
            .map(Number::from)
            .or_else(|| Number::from_f64(value)),
        Some(_) => Number::from_f64(value),
        None if value.fract() == 0.0 && value < MAX_SAFE_INTEGER => {
            Some(Number::from(value as u64))
        }
        None => Number::from_f64(value),
    }
}

/// `.5` becomes `0.5` and `5.e3` becomes `5e3`.
fn normalize_decimal(cleaned: &str) -> String {
    let (mantissa, exponent) = match cleaned.find(|c: char| c == 'e' || c == 'E') {
        Some(index) => (&cleaned[..index], &cleaned[index..]),
        None => (cleaned, ""),
    };

    let mantissa = mantissa.trim_end_matches('.');
    if mantissa.starts_with('.') {
        format!("0{}{}", mantissa, exponent)
    } else {
        format!("{}{}", mantissa, exponent)
    }
}

/// Parse without rounding; `None` when the literal does not fit a `Decimal`
/// exactly, in which case the float decides.
fn exact_decimal(normalized: &str) -> Option<Decimal> {
    match normalized.find(|c: char| c == 'e' || c == 'E') {
        None => Decimal::from_str_exact(normalized).ok(),
        Some(index) => {
            let exponent = i64::from_str(&normalized[index + 1..]).ok()?;
            if exponent.abs() > 28 {
                return None;
            }
            Decimal::from_scientific(normalized).ok()
        }
    }
}

fn negate(number: &Number) -> Option<Number> {
    // JSON integers have no negative zero
    if number.as_u64() == Some(0) {
        return Number::from_f64(-0.0);
    }
    if let Some(value) = number.as_i64() {
        return value.checked_neg().map(Number::from);
    }
    if number.as_u64() == Some(1 << 63) {
        return Some(Number::from(i64::MIN));
    }
    number.as_f64().and_then(|value| Number::from_f64(-value))
}

fn malformed_number(raw: &str, reason: &str) -> TransformError {
    TransformError::MalformedLiteral {
        kind: "numeric",
        raw: raw.to_string(),
        reason: reason.to_string(),
    }
}
