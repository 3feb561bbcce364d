//! Runtime validation and normalization engine
//!
//! Entity contracts are declarative [`Schema`] values built from
//! [`Field`] rules:
//!
//! - [`Schema`]: ordered field rules + object-level refinements, with
//!   set-operation derivation (`omit`, `pick`, `partial`, `extend`)
//! - [`Field`] / [`FieldKind`]: one wire field's type, bounds,
//!   presence, and default
//! - [`Issue`] / [`ValidationError`]: every violation from one parse
//!   call, with dotted/indexed paths
//! - [`Clock`]: injectable time source for `createdAt`-style defaults
//!
//! # Example
//!
//! ```
//! use contracts::schema::{Field, FieldKind, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new(
//!     "Guest",
//!     vec![
//!         Field::required("name", FieldKind::text(1, 100)),
//!         Field::required("vip", FieldKind::Boolean).with_default(json!(false)),
//!     ],
//! );
//!
//! let out = schema.parse_value(&json!({"name": " Ada ", "extra": 1})).unwrap();
//! assert_eq!(out, json!({"name": "Ada", "vip": false}));
//! ```

mod clock;
mod coerce;
mod field;
mod issue;
#[allow(clippy::module_inception)]
mod schema;

pub use clock::{Clock, FixedClock, SystemClock};
pub use field::{Field, FieldDefault, FieldKind, ListCase, SchemaRef};
pub use issue::{Issue, IssueKind, ValidationError, OBJECT_ISSUES_KEY, VALIDATION_FAILED_CODE};
pub use schema::{require_any_field, Refinement, Schema};
