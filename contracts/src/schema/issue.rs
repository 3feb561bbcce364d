//! Validation failure types
//!
//! A parse call either returns the normalized value or a
//! [`ValidationError`] carrying every violation found, each with the
//! dotted/indexed path of the offending field. Callers can render the
//! aggregate uniformly for any schema (field-by-field API payloads).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error code reported in HTTP envelopes for a failed validation.
///
/// Matches the platform-wide "validation failed" code so generic
/// client-side error handling treats this layer like any other source.
pub const VALIDATION_FAILED_CODE: u16 = 2;

/// Key under which object-level issues appear in [`ValidationError::field_errors`].
pub const OBJECT_ISSUES_KEY: &str = "_object";

/// The rule family a single issue violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Runtime type is incompatible with the declared field type.
    TypeMismatch,
    /// Correct type, but a bound was violated (range, length, format).
    Constraint,
    /// String value outside the field's closed domain set.
    UnknownVariant,
    /// Required field absent from the input.
    MissingField,
    /// Object-level refinement failed after every field passed.
    CrossField,
    /// Delimited string or date string could not be decomposed.
    Unparseable,
}

/// One violation, located by path within the input value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Dotted/indexed location, e.g. `items[2].unitPrice`. Empty for
    /// object-level issues.
    pub path: String,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    /// Re-anchor this issue below `prefix` (nested object/list descent).
    pub(crate) fn under(mut self, prefix: &str) -> Self {
        self.path = if self.path.is_empty() {
            prefix.to_string()
        } else if self.path.starts_with('[') {
            format!("{prefix}{}", self.path)
        } else {
            format!("{prefix}.{}", self.path)
        };
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Aggregate validation failure: the complete set of issues from one
/// parse call. Never first-error-only.
#[derive(Debug, Clone, Error)]
#[error("{schema} validation failed with {} issue(s)", .issues.len())]
pub struct ValidationError {
    /// Name of the schema whose parse failed.
    pub schema: &'static str,
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(schema: &'static str, issues: Vec<Issue>) -> Self {
        Self { schema, issues }
    }

    /// Issues grouped by field path, object-level issues under
    /// [`OBJECT_ISSUES_KEY`]. Ready for a field-by-field API response.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for issue in &self.issues {
            let key = if issue.path.is_empty() {
                OBJECT_ISSUES_KEY.to_string()
            } else {
                issue.path.clone()
            };
            map.entry(key).or_default().push(issue.message.clone());
        }
        map
    }

    /// Structured details in the platform error-envelope shape.
    pub fn details(&self) -> HashMap<String, Value> {
        let mut details = HashMap::new();
        details.insert(
            "fields".to_string(),
            serde_json::to_value(self.field_errors()).unwrap_or(Value::Null),
        );
        details.insert(
            "issues".to_string(),
            serde_json::to_value(&self.issues).unwrap_or(Value::Null),
        );
        details
    }
}

impl axum::response::IntoResponse for ValidationError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        tracing::debug!(
            schema = self.schema,
            issues = self.issues.len(),
            "rejected payload"
        );

        let body = serde_json::json!({
            "code": VALIDATION_FAILED_CODE,
            "message": self.to_string(),
            "details": self.details(),
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = Issue::new("email", IssueKind::Constraint, "invalid email format");
        assert_eq!(format!("{}", issue), "email: invalid email format");

        let object = Issue::new("", IssueKind::CrossField, "at least one field required");
        assert_eq!(format!("{}", object), "at least one field required");
    }

    #[test]
    fn test_under_joins_paths() {
        let issue = Issue::new("unitPrice", IssueKind::Constraint, "must be >= 0");
        let issue = issue.under("[2]").under("items");
        assert_eq!(issue.path, "items[2].unitPrice");

        let elem = Issue::new("[1]", IssueKind::UnknownVariant, "not a member");
        assert_eq!(elem.under("allergies").path, "allergies[1]");

        let whole = Issue::new("", IssueKind::TypeMismatch, "expected object");
        assert_eq!(whole.under("items").path, "items");
    }

    #[test]
    fn test_field_errors_grouping() {
        let err = ValidationError::new(
            "Order",
            vec![
                Issue::new("totalAmount", IssueKind::Constraint, "must be >= 0"),
                Issue::new("totalAmount", IssueKind::TypeMismatch, "expected number"),
                Issue::new("", IssueKind::CrossField, "empty update"),
            ],
        );
        let fields = err.field_errors();
        assert_eq!(fields["totalAmount"].len(), 2);
        assert_eq!(fields[OBJECT_ISSUES_KEY], vec!["empty update"]);
    }

    #[test]
    fn test_details_shape() {
        let err = ValidationError::new(
            "User",
            vec![Issue::new("email", IssueKind::Constraint, "invalid email format")],
        );
        let details = err.details();
        assert!(details.contains_key("fields"));
        let issues = details["issues"].as_array().unwrap();
        assert_eq!(issues[0]["kind"], "constraint");
        assert_eq!(issues[0]["path"], "email");
    }

    #[test]
    fn test_into_response_is_bad_request() {
        use axum::response::IntoResponse;

        let err = ValidationError::new(
            "User",
            vec![Issue::new("email", IssueKind::Constraint, "invalid email format")],
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_display_counts_issues() {
        let err = ValidationError::new(
            "Payment",
            vec![
                Issue::new("amount", IssueKind::Constraint, "must be >= 0"),
                Issue::new("method", IssueKind::UnknownVariant, "not a member"),
            ],
        );
        assert_eq!(format!("{}", err), "Payment validation failed with 2 issue(s)");
    }
}
