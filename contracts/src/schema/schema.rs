//! Schema definition and the parse pass
//!
//! A [`Schema`] is an ordered list of [`Field`] rules plus object-level
//! refinements. `parse_value` makes one pass over the declared fields:
//! coerce, validate, default. Unknown input keys are dropped, every
//! issue is collected before reporting, and refinements run only once
//! all field-level rules passed.
//!
//! Derived contracts (create/update/search payloads) are built by set
//! operations over the field list, so a rule is written once and reused
//! everywhere it appears.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::clock::{Clock, SystemClock};
use super::coerce::type_name;
use super::field::{format_datetime, Field, FieldDefault};
use super::issue::{Issue, IssueKind, ValidationError};

/// Object-level rule, run against the normalized map after every
/// field-level rule passed. The message becomes a `CrossField` issue.
pub type Refinement = fn(&Map<String, Value>) -> Result<(), String>;

/// Canned refinement for update payloads: the normalized object must
/// carry at least one field.
pub fn require_any_field(map: &Map<String, Value>) -> Result<(), String> {
    if map.is_empty() {
        Err("at least one field must be provided".to_string())
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
    refinements: Vec<Refinement>,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<Field>) -> Self {
        Self {
            name,
            fields,
            refinements: Vec::new(),
        }
    }

    /// Schema name used in error reports.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared rules, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Validate and normalize `input` against this schema.
    ///
    /// The output object contains only declared fields, each in its
    /// normalized form, with defaults filled in for absent keys. All
    /// violations from the one pass are reported together.
    pub fn parse_value(&self, input: &Value) -> Result<Value, ValidationError> {
        self.parse_value_at(input, &SystemClock)
    }

    /// [`Schema::parse_value`] with an injected clock for `Now` defaults.
    pub fn parse_value_at(
        &self,
        input: &Value,
        clock: &dyn Clock,
    ) -> Result<Value, ValidationError> {
        let Value::Object(map) = input else {
            return Err(ValidationError::new(
                self.name,
                vec![Issue::new(
                    "",
                    IssueKind::TypeMismatch,
                    format!("expected an object, got {}", type_name(input)),
                )],
            ));
        };

        let mut out = Map::new();
        let mut issues = Vec::new();
        for field in &self.fields {
            match map.get(field.name) {
                None => match &field.default {
                    Some(FieldDefault::Json(value)) => {
                        out.insert(field.name.to_string(), value.clone());
                    }
                    Some(FieldDefault::Now) => {
                        out.insert(
                            field.name.to_string(),
                            Value::from(format_datetime(clock.now())),
                        );
                    }
                    None if field.required => {
                        issues.push(Issue::new(field.name, IssueKind::MissingField, "is required"));
                    }
                    None => {}
                },
                Some(Value::Null) => {
                    if field.nullable {
                        out.insert(field.name.to_string(), Value::Null);
                    } else {
                        issues.push(Issue::new(
                            field.name,
                            IssueKind::TypeMismatch,
                            "must not be null",
                        ));
                    }
                }
                Some(value) => match field.kind.coerce(value, clock) {
                    Ok(normalized) => {
                        out.insert(field.name.to_string(), normalized);
                    }
                    Err(field_issues) => {
                        issues.extend(field_issues.into_iter().map(|i| i.under(field.name)));
                    }
                },
            }
        }

        if issues.is_empty() {
            for refinement in &self.refinements {
                if let Err(message) = refinement(&out) {
                    issues.push(Issue::new("", IssueKind::CrossField, message));
                }
            }
        }

        if issues.is_empty() {
            Ok(Value::Object(out))
        } else {
            Err(ValidationError::new(self.name, issues))
        }
    }

    /// Validate, normalize, and deserialize into a typed projection.
    pub fn parse<T: DeserializeOwned>(&self, input: &Value) -> Result<T, ValidationError> {
        self.parse_with_clock(input, &SystemClock)
    }

    /// [`Schema::parse`] with an injected clock for `Now` defaults.
    pub fn parse_with_clock<T: DeserializeOwned>(
        &self,
        input: &Value,
        clock: &dyn Clock,
    ) -> Result<T, ValidationError> {
        let normalized = self.parse_value_at(input, clock)?;
        serde_json::from_value(normalized).map_err(|e| {
            ValidationError::new(
                self.name,
                vec![Issue::new(
                    "",
                    IssueKind::TypeMismatch,
                    format!("normalized value does not fit the target type: {e}"),
                )],
            )
        })
    }

    /// Copy without the named fields. Refinements are kept and must
    /// tolerate the narrower object.
    pub fn omit(&self, names: &[&str]) -> Schema {
        Schema {
            name: self.name,
            fields: self
                .fields
                .iter()
                .filter(|f| !names.contains(&f.name))
                .cloned()
                .collect(),
            refinements: self.refinements.clone(),
        }
    }

    /// Copy with only the named fields, in declaration order.
    pub fn pick(&self, names: &[&str]) -> Schema {
        Schema {
            name: self.name,
            fields: self
                .fields
                .iter()
                .filter(|f| names.contains(&f.name))
                .cloned()
                .collect(),
            refinements: self.refinements.clone(),
        }
    }

    /// Copy with every field optional and no defaults or refinements.
    /// Absent fields then stay absent, so an update touches only what
    /// the caller sent.
    pub fn partial(&self) -> Schema {
        Schema {
            name: self.name,
            fields: self
                .fields
                .iter()
                .map(|f| {
                    let mut f = f.clone();
                    f.required = false;
                    f.default = None;
                    f
                })
                .collect(),
            refinements: Vec::new(),
        }
    }

    /// Union of two schemas. On duplicate names the right side wins in
    /// place; refinements are concatenated.
    pub fn extend(&self, other: &Schema) -> Schema {
        let mut fields = self.fields.clone();
        for field in &other.fields {
            match fields.iter_mut().find(|f| f.name == field.name) {
                Some(slot) => *slot = field.clone(),
                None => fields.push(field.clone()),
            }
        }
        let mut refinements = self.refinements.clone();
        refinements.extend(other.refinements.iter().copied());
        Schema {
            name: self.name,
            fields,
            refinements,
        }
    }

    /// Upsert one field: replace in place when the name exists,
    /// append otherwise.
    pub fn with_field(&self, field: Field) -> Schema {
        let mut next = self.clone();
        match next.fields.iter_mut().find(|f| f.name == field.name) {
            Some(slot) => *slot = field,
            None => next.fields.push(field),
        }
        next
    }

    pub fn named(mut self, name: &'static str) -> Schema {
        self.name = name;
        self
    }

    pub fn refine(mut self, refinement: Refinement) -> Schema {
        self.refinements.push(refinement);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::clock::FixedClock;
    use crate::schema::field::{FieldKind, ListCase};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn note_schema() -> Schema {
        Schema::new(
            "Note",
            vec![
                Field::required("title", FieldKind::text(1, 50)),
                Field::optional("body", FieldKind::text(0, 500)),
                Field::required("pinned", FieldKind::Boolean).with_default(json!(false)),
                Field::optional("archivedAt", FieldKind::DateTime)
                    .nullable()
                    .with_default(json!(null)),
                Field::required("createdAt", FieldKind::DateTime).default_now(),
                Field::optional("tags", FieldKind::TextList(ListCase::AsIs))
                    .with_default(json!([])),
            ],
        )
    }

    fn line_schema() -> &'static Schema {
        static SCHEMA: std::sync::OnceLock<Schema> = std::sync::OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(
                "Line",
                vec![
                    Field::required("sku", FieldKind::positive()),
                    Field::required("qty", FieldKind::positive()),
                ],
            )
        })
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        let out = note_schema()
            .parse_value_at(&json!({"title": "a", "color": "red"}), &clock)
            .unwrap();
        assert_eq!(
            out,
            json!({
                "title": "a",
                "pinned": false,
                "archivedAt": null,
                "createdAt": "2025-03-01T12:00:00Z",
                "tags": [],
            })
        );
    }

    #[test]
    fn test_missing_required_field_is_collected() {
        let err = note_schema().parse_value(&json!({})).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "title");
        assert_eq!(err.issues[0].kind, IssueKind::MissingField);
    }

    #[test]
    fn test_null_only_legal_for_nullable_fields() {
        let err = note_schema()
            .parse_value(&json!({"title": null, "archivedAt": null}))
            .unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "title");
        assert_eq!(err.issues[0].message, "must not be null");
    }

    #[test]
    fn test_top_level_non_object_is_rejected() {
        let err = note_schema().parse_value(&json!([1, 2])).unwrap_err();
        assert_eq!(err.issues[0].message, "expected an object, got array");
    }

    #[test]
    fn test_all_issues_reported_in_one_pass() {
        let err = note_schema()
            .parse_value(&json!({"title": "", "pinned": "maybe", "createdAt": "not a date"}))
            .unwrap_err();
        let paths: Vec<&str> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["title", "pinned", "createdAt"]);
    }

    #[test]
    fn test_fixed_clock_makes_now_defaults_deterministic() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap());
        let out = note_schema()
            .parse_value_at(&json!({"title": "a"}), &clock)
            .unwrap();
        assert_eq!(out["createdAt"], json!("2024-12-31T23:59:59Z"));
    }

    #[test]
    fn test_parse_is_idempotent_on_its_own_output() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        let input = json!({"title": " a ", "tags": " x , y ", "body": "hi"});
        let once = note_schema().parse_value_at(&input, &clock).unwrap();
        let twice = note_schema().parse_value_at(&once, &clock).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_partial_drops_requirements_and_defaults() {
        let update = note_schema().partial().refine(require_any_field);
        let out = update.parse_value(&json!({"title": "new"})).unwrap();
        assert_eq!(out, json!({"title": "new"}));

        let err = update.parse_value(&json!({})).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].kind, IssueKind::CrossField);
        assert_eq!(err.issues[0].path, "");
    }

    #[test]
    fn test_require_any_field_ignores_unknown_keys() {
        let update = note_schema().partial().refine(require_any_field);
        let err = update.parse_value(&json!({"bogus": 1})).unwrap_err();
        assert_eq!(err.issues[0].kind, IssueKind::CrossField);
    }

    #[test]
    fn test_omit_pick_and_with_field() {
        let base = note_schema();
        let created = base.omit(&["createdAt", "archivedAt"]);
        assert!(created.fields().iter().all(|f| f.name != "createdAt"));

        let picked = base.pick(&["body", "title"]);
        let names: Vec<&str> = picked.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["title", "body"]);

        let widened = base.with_field(Field::optional("color", FieldKind::text(1, 20)));
        assert!(widened.fields().iter().any(|f| f.name == "color"));
        assert_eq!(base.fields().len() + 1, widened.fields().len());
    }

    #[test]
    fn test_extend_right_side_wins() {
        let left = Schema::new(
            "Left",
            vec![
                Field::required("a", FieldKind::integer()),
                Field::required("b", FieldKind::integer()),
            ],
        );
        let right = Schema::new(
            "Right",
            vec![
                Field::optional("b", FieldKind::text(1, 10)),
                Field::required("c", FieldKind::Boolean),
            ],
        );
        let merged = left.extend(&right);
        let names: Vec<&str> = merged.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(matches!(merged.fields()[1].kind, FieldKind::Text { .. }));
        assert!(!merged.fields()[1].required);
    }

    #[test]
    fn test_nested_object_list_paths() {
        let schema = Schema::new(
            "Cart",
            vec![Field::required("lines", FieldKind::ObjectList(line_schema))],
        );
        let err = schema
            .parse_value(&json!({"lines": [{"sku": 1, "qty": 2}, {"sku": 0}]}))
            .unwrap_err();
        let paths: Vec<&str> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["lines[1].sku", "lines[1].qty"]);
    }

    #[test]
    fn test_nested_object_normalizes_recursively() {
        let schema = Schema::new(
            "Cart",
            vec![Field::required("lines", FieldKind::ObjectList(line_schema))],
        );
        let out = schema
            .parse_value(&json!({"lines": [{"sku": "7", "qty": 1.0, "junk": true}]}))
            .unwrap();
        assert_eq!(out, json!({"lines": [{"sku": 7, "qty": 1}]}));
    }

    #[test]
    fn test_typed_parse_roundtrip() {
        #[derive(serde::Deserialize)]
        struct Line {
            sku: i64,
            qty: i64,
        }
        let line: Line = line_schema().parse(&json!({"sku": "3", "qty": 2})).unwrap();
        assert_eq!(line.sku, 3);
        assert_eq!(line.qty, 2);
    }
}
