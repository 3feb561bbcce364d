//! Shared data contracts for the restaurant platform
//!
//! Schema definitions for every domain entity plus the runtime
//! validation engine that enforces them at service boundaries:
//! coercion, defaulting, enum normalization, and structured
//! field-by-field failure reporting.

pub mod enums;
pub mod models;
pub mod query;
pub mod schema;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

// Engine re-exports (for convenient access)
pub use query::PaginatedResponse;
pub use schema::{Clock, FixedClock, Issue, IssueKind, Schema, SystemClock, ValidationError};
