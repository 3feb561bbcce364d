//! User Model

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::enums::{Role, SortOrder, UserSortBy};
use crate::query::search_fragment;
use crate::schema::{require_any_field, Field, FieldKind, Schema, ValidationError};

/// Field rules for the stored user record.
pub fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "User",
            vec![
                Field::required("id", FieldKind::positive()),
                Field::required("name", FieldKind::text(1, 100)),
                Field::required("email", FieldKind::Email),
                Field::required("role", FieldKind::Enum(&Role::DEF)),
                Field::required("password", FieldKind::text(8, 128)),
                Field::required("isActive", FieldKind::Boolean).with_default(json!(true)),
                Field::required("createdAt", FieldKind::DateTime).default_now(),
                Field::required("updatedAt", FieldKind::DateTime).default_now(),
                Field::optional("lastLogin", FieldKind::DateTime)
                    .nullable()
                    .with_default(json!(null)),
            ],
        )
    })
}

/// Create payload rules. Identity and audit stamps are server-assigned,
/// so they are not part of the contract.
pub fn create_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        schema()
            .omit(&["id", "createdAt", "updatedAt", "lastLogin"])
            .named("UserCreate")
    })
}

/// Update payload rules: any subset of the create fields (credentials
/// included), but never an empty one.
pub fn update_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        create_schema()
            .partial()
            .named("UserUpdate")
            .refine(require_any_field)
    })
}

/// Outbound user rules, without the write-only password.
pub fn response_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| schema().omit(&["password"]).named("UserResponse"))
}

/// Search payload rules: optional filters plus the shared pagination
/// fragment.
pub fn search_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "UserSearch",
            vec![
                Field::optional("name", FieldKind::text(1, 100)),
                Field::optional("email", FieldKind::text(1, 254)),
                Field::optional("role", FieldKind::Enum(&Role::DEF)),
                Field::optional("isActive", FieldKind::Boolean),
            ],
        )
        .extend(&search_fragment(&UserSortBy::DEF))
    })
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Write-only credential, absent from responses.
    pub password: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        schema().parse(input)
    }
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
    pub is_active: bool,
}

impl UserCreate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        create_schema().parse(input)
    }
}

/// Update user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        update_schema().parse(input)
    }
}

/// User response (without password)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserResponse {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        response_schema().parse(input)
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login: user.last_login,
        }
    }
}

/// Search users payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: UserSortBy,
    pub sort_order: SortOrder,
}

impl UserSearch {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        search_schema().parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FixedClock, IssueKind};
    use chrono::TimeZone;

    #[test]
    fn test_create_fills_defaults_and_normalizes() {
        let user = UserCreate::parse(&json!({
            "name": "  Marta Ruiz ",
            "email": "Marta.Ruiz@Example.COM",
            "role": "manager",
            "password": "s3cret-pass",
        }))
        .unwrap();
        assert_eq!(user.name, "Marta Ruiz");
        assert_eq!(user.email, "marta.ruiz@example.com");
        assert_eq!(user.role, Role::Manager);
        assert!(user.is_active);
    }

    #[test]
    fn test_create_never_accepts_identity_fields() {
        let out = create_schema()
            .parse_value(&json!({
                "id": 99,
                "name": "Marta",
                "email": "m@example.com",
                "role": "ADMIN",
                "password": "longenough",
            }))
            .unwrap();
        assert!(out.get("id").is_none());
    }

    #[test]
    fn test_short_password_is_rejected() {
        let err = create_schema()
            .parse_value(&json!({
                "name": "Marta",
                "email": "m@example.com",
                "role": "ADMIN",
                "password": "short",
            }))
            .unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "password");
        assert_eq!(err.issues[0].message, "must be at least 8 characters");
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let err = UserUpdate::parse(&json!({})).unwrap_err();
        assert_eq!(err.schema, "UserUpdate");
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].kind, IssueKind::CrossField);
    }

    #[test]
    fn test_single_field_update_succeeds() {
        let update = UserUpdate::parse(&json!({"isActive": "false"})).unwrap();
        assert_eq!(update.is_active, Some(false));
        assert!(update.name.is_none());
    }

    #[test]
    fn test_fixed_clock_stamps_audit_fields() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
        let user: User = schema()
            .parse_with_clock(
                &json!({
                    "id": 1,
                    "name": "Marta",
                    "email": "m@example.com",
                    "role": "ADMIN",
                    "password": "longenough",
                }),
                &clock,
            )
            .unwrap();
        assert_eq!(user.created_at, clock.0);
        assert_eq!(user.updated_at, clock.0);
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_search_defaults() {
        let search = UserSearch::parse(&json!({})).unwrap();
        assert_eq!(search.page, 1);
        assert_eq!(search.page_size, 10);
        assert_eq!(search.sort_by, UserSortBy::Id);
        assert_eq!(search.sort_order, SortOrder::Asc);
        assert!(search.role.is_none());
    }

    #[test]
    fn test_response_drops_password() {
        let out = response_schema()
            .parse_value(&json!({
                "id": 1,
                "name": "Marta",
                "email": "m@example.com",
                "role": "ADMIN",
                "password": "longenough",
                "createdAt": "2025-03-01T09:00:00Z",
                "updatedAt": "2025-03-01T09:00:00Z",
            }))
            .unwrap();
        assert!(out.get("password").is_none());
        assert_eq!(out["role"], json!("ADMIN"));
    }
}
