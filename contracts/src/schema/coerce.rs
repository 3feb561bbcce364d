//! Primitive coercion rules
//!
//! Boundary input arrives loosely typed (query strings carry numbers
//! and booleans as text; list fields arrive as arrays or as one
//! comma-delimited string). Each rule here converts one loose shape
//! into its strict internal type or reports why it cannot.
//!
//! Rules return the violation kind plus a message; the schema engine
//! attaches field paths.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::issue::IssueKind;

pub(crate) type CoerceResult<T> = Result<T, (IssueKind, String)>;

/// JSON type name for error messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Integer from a JSON integer, an integer-valued float, or a decimal
/// string. JSON encoders routinely emit `3.0` for whole numbers, so
/// integral floats are accepted; fractional ones are not.
pub(crate) fn integer(value: &Value) -> CoerceResult<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Ok(f as i64)
                } else {
                    Err((
                        IssueKind::TypeMismatch,
                        format!("expected an integer, got {f}"),
                    ))
                }
            } else {
                Err((IssueKind::TypeMismatch, "expected an integer".to_string()))
            }
        }
        Value::String(s) => {
            let t = s.trim();
            t.parse::<i64>().map_err(|_| {
                (
                    IssueKind::TypeMismatch,
                    format!("expected an integer, got \"{t}\""),
                )
            })
        }
        other => Err((
            IssueKind::TypeMismatch,
            format!("expected an integer, got {}", type_name(other)),
        )),
    }
}

/// Exact decimal from a JSON number or a numeric string. Parsed from
/// the textual form so `19.99` survives without a float detour.
pub(crate) fn decimal(value: &Value) -> CoerceResult<Decimal> {
    let parse = |t: &str| {
        Decimal::from_str(t)
            .or_else(|_| Decimal::from_scientific(t))
            .map_err(|_| {
                (
                    IssueKind::TypeMismatch,
                    format!("expected a decimal number, got \"{t}\""),
                )
            })
    };
    match value {
        Value::Number(n) => parse(&n.to_string()),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return Err((
                    IssueKind::TypeMismatch,
                    "expected a decimal number, got an empty string".to_string(),
                ));
            }
            parse(t)
        }
        other => Err((
            IssueKind::TypeMismatch,
            format!("expected a decimal number, got {}", type_name(other)),
        )),
    }
}

/// Finite float from a JSON number or a numeric string.
pub(crate) fn float(value: &Value) -> CoerceResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .ok_or_else(|| (IssueKind::TypeMismatch, "expected a number".to_string())),
        Value::String(s) => {
            let t = s.trim();
            match t.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(f),
                _ => Err((
                    IssueKind::TypeMismatch,
                    format!("expected a number, got \"{t}\""),
                )),
            }
        }
        other => Err((
            IssueKind::TypeMismatch,
            format!("expected a number, got {}", type_name(other)),
        )),
    }
}

/// Boolean from a JSON bool or exactly the strings `"true"`/`"false"`
/// (case-sensitive). Every other string is a hard failure, never a
/// silent fall-through to a default.
pub(crate) fn boolean(value: &Value) -> CoerceResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err((
                IssueKind::TypeMismatch,
                format!("expected a boolean or \"true\"/\"false\", got \"{other}\""),
            )),
        },
        other => Err((
            IssueKind::TypeMismatch,
            format!("expected a boolean, got {}", type_name(other)),
        )),
    }
}

/// Timestamp from an RFC 3339 string, a naive date-time, a bare date
/// (midnight UTC), or integer Unix milliseconds.
pub(crate) fn datetime(value: &Value) -> CoerceResult<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let t = s.trim();
            parse_datetime_str(t).ok_or_else(|| {
                (
                    IssueKind::Unparseable,
                    format!("unrecognized date/time \"{t}\""),
                )
            })
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(|| {
                (
                    IssueKind::TypeMismatch,
                    "expected Unix milliseconds".to_string(),
                )
            }),
        other => Err((
            IssueKind::TypeMismatch,
            format!("expected a date/time, got {}", type_name(other)),
        )),
    }
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Comma-delimited tokens: trimmed, empty segments dropped. An empty
/// string is an empty list, never an error.
pub(crate) fn split_delimited(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Title Case normalization for ingredient-style tokens
/// (`"olive  oil"` → `"Olive Oil"`).
pub(crate) fn title_case(token: &str) -> String {
    token
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Structural email check: one `@`, non-empty local part, dotted
/// domain, no whitespace.
pub(crate) fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Phone check: optional `+`, then digits with common separators,
/// at least 7 digits total.
pub(crate) fn is_valid_phone(s: &str) -> bool {
    let trimmed = s.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if rest.is_empty() {
        return false;
    }
    let mut digits = 0;
    for c in rest.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '(' | ')' | '.' => {}
            _ => return false,
        }
    }
    digits >= 7
}

/// Reference id from an integer, a numeric string, or an object
/// carrying a numeric `id` member.
pub(crate) fn reference_id(value: &Value) -> CoerceResult<i64> {
    match value {
        Value::Object(map) => match map.get("id") {
            Some(inner) => integer(inner),
            None => Err((
                IssueKind::TypeMismatch,
                "expected an id or an object with an \"id\" member".to_string(),
            )),
        },
        _ => integer(value),
    }
}
