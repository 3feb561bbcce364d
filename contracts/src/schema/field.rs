//! Field rules
//!
//! A [`Field`] pairs a wire name with a [`FieldKind`] (type + bounds),
//! presence flags, and an optional default. [`FieldKind::coerce`] turns
//! one present, non-null input value into its normalized form, or
//! reports every violation. Issue paths returned here are relative to
//! the field; the schema engine prefixes the field name.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use super::clock::Clock;
use super::coerce::{self, type_name};
use super::issue::{Issue, IssueKind};
use super::schema::Schema;
use crate::enums::EnumDef;

/// Accessor for a nested schema. Plain function pointers keep schemas
/// `Sync` and let definitions reference each other lazily.
pub type SchemaRef = fn() -> &'static Schema;

/// Casing applied to free-text list tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCase {
    AsIs,
    /// `"olive  oil"` → `"Olive Oil"`.
    Title,
    Upper,
}

/// Value inserted when an input key is absent.
#[derive(Debug, Clone)]
pub enum FieldDefault {
    /// A fixed, already-normalized JSON value.
    Json(Value),
    /// The injected clock's current instant, as RFC 3339.
    Now,
}

/// Declared type and bounds of one field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Integer { min: Option<i64>, max: Option<i64> },
    Decimal { min: Option<Decimal>, max: Option<Decimal> },
    Float { min: Option<f64>, max: Option<f64> },
    Boolean,
    /// Trimmed text with a char-count range.
    Text { min_len: usize, max_len: Option<usize> },
    Email,
    Phone,
    DateTime,
    Enum(&'static EnumDef),
    EnumList(&'static EnumDef),
    TextList(ListCase),
    /// Positive references, accepted as ints, digit strings, objects
    /// with an `id` member, or one comma-delimited string.
    IdList,
    Object(SchemaRef),
    ObjectList(SchemaRef),
}

impl FieldKind {
    /// Integer with no bounds.
    pub fn integer() -> Self {
        FieldKind::Integer { min: None, max: None }
    }

    /// Integer `>= 1` (ids, counts).
    pub fn positive() -> Self {
        FieldKind::Integer { min: Some(1), max: None }
    }

    /// Integer `>= 0`.
    pub fn unsigned() -> Self {
        FieldKind::Integer { min: Some(0), max: None }
    }

    pub fn int_range(min: i64, max: i64) -> Self {
        FieldKind::Integer { min: Some(min), max: Some(max) }
    }

    /// Decimal `>= 0`, the shape of every monetary field.
    pub fn money() -> Self {
        FieldKind::Decimal { min: Some(Decimal::ZERO), max: None }
    }

    /// Trimmed text whose char count must fall in `min_len..=max_len`.
    pub fn text(min_len: usize, max_len: usize) -> Self {
        FieldKind::Text { min_len, max_len: Some(max_len) }
    }
}

/// One named rule inside a schema.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Whether an explicit JSON `null` is legal for this field.
    pub nullable: bool,
    pub default: Option<FieldDefault>,
}

impl Field {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true, nullable: false, default: None }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, nullable: false, default: None }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attach a fixed default, inserted verbatim when the key is absent.
    /// Defaults are authored in normalized form.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(FieldDefault::Json(value));
        self
    }

    /// Default to the clock's current instant when the key is absent.
    pub fn default_now(mut self) -> Self {
        self.default = Some(FieldDefault::Now);
        self
    }
}

/// Canonical textual form for normalized timestamps.
pub(crate) fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn lone(err: (IssueKind, String)) -> Vec<Issue> {
    vec![Issue::new("", err.0, err.1)]
}

fn constraint(message: String) -> Vec<Issue> {
    vec![Issue::new("", IssueKind::Constraint, message)]
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    value: T,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), Vec<Issue>> {
    if let Some(min) = min {
        if value < min {
            return Err(constraint(format!("must be at least {min}")));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(constraint(format!("must be at most {max}")));
        }
    }
    Ok(())
}

/// Integer-valued numbers normalize to integer JSON numbers so that
/// parsing its own output is a fixed point.
fn decimal_value(d: Decimal) -> Value {
    if d.fract().is_zero() {
        if let Some(i) = d.to_i64() {
            return Value::from(i);
        }
    }
    d.to_f64().map(Value::from).unwrap_or(Value::Null)
}

fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Value::from(f as i64)
    } else {
        Value::from(f)
    }
}

fn unknown_variant(def: &EnumDef, got: &str) -> (IssueKind, String) {
    (
        IssueKind::UnknownVariant,
        format!(
            "unknown {} \"{}\" (expected one of: {})",
            def.name,
            got,
            def.variants.join(", ")
        ),
    )
}

impl FieldKind {
    /// Coerce and validate one present, non-null value.
    pub(crate) fn coerce(&self, value: &Value, clock: &dyn Clock) -> Result<Value, Vec<Issue>> {
        match self {
            FieldKind::Integer { min, max } => {
                let n = coerce::integer(value).map_err(lone)?;
                check_range(n, *min, *max)?;
                Ok(Value::from(n))
            }
            FieldKind::Decimal { min, max } => {
                let d = coerce::decimal(value).map_err(lone)?;
                check_range(d, *min, *max)?;
                Ok(decimal_value(d))
            }
            FieldKind::Float { min, max } => {
                let f = coerce::float(value).map_err(lone)?;
                check_range(f, *min, *max)?;
                Ok(float_value(f))
            }
            FieldKind::Boolean => {
                let b = coerce::boolean(value).map_err(lone)?;
                Ok(Value::Bool(b))
            }
            FieldKind::Text { min_len, max_len } => {
                let Value::String(s) = value else {
                    return Err(lone((
                        IssueKind::TypeMismatch,
                        format!("expected a string, got {}", type_name(value)),
                    )));
                };
                let t = s.trim();
                let len = t.chars().count();
                if len < *min_len {
                    return Err(constraint(if *min_len == 1 {
                        "must not be empty".to_string()
                    } else {
                        format!("must be at least {min_len} characters")
                    }));
                }
                if let Some(max) = max_len {
                    if len > *max {
                        return Err(constraint(format!("must be at most {max} characters")));
                    }
                }
                Ok(Value::from(t))
            }
            FieldKind::Email => {
                let Value::String(s) = value else {
                    return Err(lone((
                        IssueKind::TypeMismatch,
                        format!("expected a string, got {}", type_name(value)),
                    )));
                };
                let t = s.trim().to_ascii_lowercase();
                if !coerce::is_valid_email(&t) {
                    return Err(constraint("must be a valid email address".to_string()));
                }
                Ok(Value::from(t))
            }
            FieldKind::Phone => {
                let Value::String(s) = value else {
                    return Err(lone((
                        IssueKind::TypeMismatch,
                        format!("expected a string, got {}", type_name(value)),
                    )));
                };
                let t = s.trim();
                if !coerce::is_valid_phone(t) {
                    return Err(constraint("must be a valid phone number".to_string()));
                }
                Ok(Value::from(t))
            }
            FieldKind::DateTime => {
                let dt = coerce::datetime(value).map_err(lone)?;
                Ok(Value::from(format_datetime(dt)))
            }
            FieldKind::Enum(def) => {
                let Value::String(s) = value else {
                    return Err(lone((
                        IssueKind::TypeMismatch,
                        format!("expected a string, got {}", type_name(value)),
                    )));
                };
                let t = s.trim();
                match def.canonical(t) {
                    Some(canon) => Ok(Value::from(canon)),
                    None => Err(lone(unknown_variant(def, t))),
                }
            }
            FieldKind::EnumList(def) => coerce_tokens(value, |token| {
                def.canonical(token)
                    .map(Value::from)
                    .ok_or_else(|| unknown_variant(def, token))
            }),
            FieldKind::TextList(case) => coerce_tokens(value, |token| {
                Ok(match case {
                    ListCase::AsIs => Value::from(token),
                    ListCase::Title => Value::from(coerce::title_case(token)),
                    ListCase::Upper => Value::from(token.to_uppercase()),
                })
            }),
            FieldKind::IdList => coerce_id_list(value),
            FieldKind::Object(schema) => {
                if !value.is_object() {
                    return Err(lone((
                        IssueKind::TypeMismatch,
                        format!("expected an object, got {}", type_name(value)),
                    )));
                }
                schema().parse_value_at(value, clock).map_err(|e| e.issues)
            }
            FieldKind::ObjectList(schema) => {
                let Value::Array(items) = value else {
                    return Err(lone((
                        IssueKind::TypeMismatch,
                        format!("expected a list of objects, got {}", type_name(value)),
                    )));
                };
                let mut out = Vec::with_capacity(items.len());
                let mut issues = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    if !item.is_object() {
                        issues.push(Issue::new(
                            format!("[{i}]"),
                            IssueKind::TypeMismatch,
                            format!("expected an object, got {}", type_name(item)),
                        ));
                        continue;
                    }
                    match schema().parse_value_at(item, clock) {
                        Ok(normalized) => out.push(normalized),
                        Err(e) => {
                            let prefix = format!("[{i}]");
                            issues.extend(e.issues.into_iter().map(|iss| iss.under(&prefix)));
                        }
                    }
                }
                if issues.is_empty() {
                    Ok(Value::Array(out))
                } else {
                    Err(issues)
                }
            }
        }
    }
}

/// Walk a token list (native array of strings or one comma-delimited
/// string), applying `normalize` per trimmed, non-empty token. Issue
/// indices refer to the input positions.
fn coerce_tokens(
    value: &Value,
    normalize: impl Fn(&str) -> Result<Value, (IssueKind, String)>,
) -> Result<Value, Vec<Issue>> {
    let mut out = Vec::new();
    let mut issues = Vec::new();
    match value {
        Value::String(raw) => {
            for (i, token) in coerce::split_delimited(raw).iter().enumerate() {
                match normalize(token) {
                    Ok(v) => out.push(v),
                    Err((kind, message)) => {
                        issues.push(Issue::new(format!("[{i}]"), kind, message));
                    }
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let Value::String(s) = item else {
                    issues.push(Issue::new(
                        format!("[{i}]"),
                        IssueKind::TypeMismatch,
                        format!("expected a string, got {}", type_name(item)),
                    ));
                    continue;
                };
                let t = s.trim();
                if t.is_empty() {
                    continue;
                }
                match normalize(t) {
                    Ok(v) => out.push(v),
                    Err((kind, message)) => {
                        issues.push(Issue::new(format!("[{i}]"), kind, message));
                    }
                }
            }
        }
        other => {
            return Err(lone((
                IssueKind::TypeMismatch,
                format!(
                    "expected a list or comma-delimited string, got {}",
                    type_name(other)
                ),
            )));
        }
    }
    if issues.is_empty() {
        Ok(Value::Array(out))
    } else {
        Err(issues)
    }
}

fn coerce_id_list(value: &Value) -> Result<Value, Vec<Issue>> {
    let mut out = Vec::new();
    let mut issues = Vec::new();
    let mut push_id = |id: Result<i64, (IssueKind, String)>, index: usize| match id {
        Ok(id) if id > 0 => out.push(Value::from(id)),
        Ok(_) => issues.push(Issue::new(
            format!("[{index}]"),
            IssueKind::Constraint,
            "must be positive".to_string(),
        )),
        Err((kind, message)) => issues.push(Issue::new(format!("[{index}]"), kind, message)),
    };
    match value {
        Value::String(raw) => {
            for (i, token) in coerce::split_delimited(raw).iter().enumerate() {
                let parsed = token.parse::<i64>().map_err(|_| {
                    (
                        IssueKind::TypeMismatch,
                        format!("expected an id, got \"{token}\""),
                    )
                });
                push_id(parsed, i);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                push_id(coerce::reference_id(item), i);
            }
        }
        other => {
            return Err(lone((
                IssueKind::TypeMismatch,
                format!("expected a list of ids, got {}", type_name(other)),
            )));
        }
    }
    if issues.is_empty() {
        Ok(Value::Array(out))
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Allergy;
    use crate::schema::clock::SystemClock;
    use serde_json::json;

    fn coerce(kind: &FieldKind, value: Value) -> Result<Value, Vec<Issue>> {
        kind.coerce(&value, &SystemClock)
    }

    #[test]
    fn test_integer_bounds() {
        let kind = FieldKind::int_range(0, 5);
        assert_eq!(coerce(&kind, json!(3)).unwrap(), json!(3));
        assert_eq!(coerce(&kind, json!("4")).unwrap(), json!(4));
        let issues = coerce(&kind, json!(6)).unwrap_err();
        assert_eq!(issues[0].kind, IssueKind::Constraint);
        assert_eq!(issues[0].message, "must be at most 5");
    }

    #[test]
    fn test_money_rejects_negative_without_clamping() {
        let issues = coerce(&FieldKind::money(), json!(-46)).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Constraint);
        assert_eq!(issues[0].message, "must be at least 0");
    }

    #[test]
    fn test_decimal_normalizes_whole_values_to_integers() {
        assert_eq!(coerce(&FieldKind::money(), json!("46.0")).unwrap(), json!(46));
        assert_eq!(coerce(&FieldKind::money(), json!(19.99)).unwrap(), json!(19.99));
    }

    #[test]
    fn test_text_trim_and_length() {
        let kind = FieldKind::text(1, 5);
        assert_eq!(coerce(&kind, json!("  abc ")).unwrap(), json!("abc"));
        let issues = coerce(&kind, json!("   ")).unwrap_err();
        assert_eq!(issues[0].message, "must not be empty");
        let issues = coerce(&kind, json!("abcdef")).unwrap_err();
        assert_eq!(issues[0].message, "must be at most 5 characters");
    }

    #[test]
    fn test_email_lowercases() {
        assert_eq!(
            coerce(&FieldKind::Email, json!(" Guest@Example.COM ")).unwrap(),
            json!("guest@example.com")
        );
        assert!(coerce(&FieldKind::Email, json!("nope")).is_err());
    }

    #[test]
    fn test_datetime_normalizes_to_rfc3339() {
        assert_eq!(
            coerce(&FieldKind::DateTime, json!("2025-03-01 18:30:00")).unwrap(),
            json!("2025-03-01T18:30:00Z")
        );
        assert_eq!(
            coerce(&FieldKind::DateTime, json!("2025-03-01")).unwrap(),
            json!("2025-03-01T00:00:00Z")
        );
    }

    #[test]
    fn test_enum_list_from_delimited_string() {
        let kind = FieldKind::EnumList(&Allergy::DEF);
        assert_eq!(
            coerce(&kind, json!("gluten, dairy")).unwrap(),
            json!(["GLUTEN", "DAIRY"])
        );
        assert_eq!(
            coerce(&kind, json!(["Gluten", "NUTS"])).unwrap(),
            json!(["GLUTEN", "NUTS"])
        );
    }

    #[test]
    fn test_enum_list_reports_indexed_unknowns() {
        let kind = FieldKind::EnumList(&Allergy::DEF);
        let issues = coerce(&kind, json!(["gluten", "plutonium"])).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "[1]");
        assert_eq!(issues[0].kind, IssueKind::UnknownVariant);
    }

    #[test]
    fn test_text_list_title_case_both_shapes() {
        let kind = FieldKind::TextList(ListCase::Title);
        let from_array = coerce(&kind, json!(["olive oil", " TOMATO "])).unwrap();
        let from_string = coerce(&kind, json!(" olive oil , TOMATO ")).unwrap();
        assert_eq!(from_array, json!(["Olive Oil", "Tomato"]));
        assert_eq!(from_array, from_string);
    }

    #[test]
    fn test_id_list_shapes() {
        let kind = FieldKind::IdList;
        assert_eq!(coerce(&kind, json!(["1", 2, {"id": 3}])).unwrap(), json!([1, 2, 3]));
        assert_eq!(coerce(&kind, json!("4, 5")).unwrap(), json!([4, 5]));
        let issues = coerce(&kind, json!([1, 0])).unwrap_err();
        assert_eq!(issues[0].path, "[1]");
        assert_eq!(issues[0].message, "must be positive");
    }
}
