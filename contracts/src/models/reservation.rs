//! Reservation Model

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::enums::{Allergy, ReservationSortBy, ReservationStatus, SortOrder};
use crate::query::search_fragment;
use crate::schema::{require_any_field, Field, FieldKind, Schema, ValidationError};

/// Field rules for the stored reservation record. Overlap detection is
/// the scheduler's job; this layer only shapes its inputs and outputs.
pub fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "Reservation",
            vec![
                Field::required("id", FieldKind::positive()),
                Field::required("guestsCount", FieldKind::positive()),
                Field::required("time", FieldKind::DateTime),
                Field::required("guestName", FieldKind::text(1, 100)),
                Field::required("guestEmail", FieldKind::Email),
                Field::required("guestPhone", FieldKind::Phone),
                Field::required("status", FieldKind::Enum(&ReservationStatus::DEF))
                    .with_default(json!("PENDING")),
                Field::required("allergies", FieldKind::EnumList(&Allergy::DEF))
                    .with_default(json!([])),
                Field::required("tables", FieldKind::IdList).with_default(json!([])),
                Field::optional("comments", FieldKind::text(0, 500)),
                Field::required("isActive", FieldKind::Boolean).with_default(json!(true)),
                Field::required("createdAt", FieldKind::DateTime).default_now(),
                Field::required("updatedAt", FieldKind::DateTime).default_now(),
            ],
        )
    })
}

pub fn create_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        schema()
            .omit(&["id", "createdAt", "updatedAt"])
            .named("ReservationCreate")
    })
}

pub fn update_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        create_schema()
            .partial()
            .named("ReservationUpdate")
            .refine(require_any_field)
    })
}

/// Update rules restricted to what front-of-house may edit on behalf
/// of the guest.
pub fn guest_update_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        schema()
            .pick(&["guestsCount", "guestName", "guestEmail", "guestPhone", "allergies"])
            .partial()
            .named("ReservationGuestUpdate")
            .refine(require_any_field)
    })
}

pub fn search_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "ReservationSearch",
            vec![
                Field::optional("status", FieldKind::Enum(&ReservationStatus::DEF)),
                Field::optional("guestName", FieldKind::text(1, 100)),
                Field::optional("isActive", FieldKind::Boolean),
                Field::optional("from", FieldKind::DateTime),
                Field::optional("to", FieldKind::DateTime),
            ],
        )
        .extend(&search_fragment(&ReservationSortBy::DEF))
    })
}

fn conflict_table_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "ConflictTable",
            vec![
                Field::required("id", FieldKind::positive()),
                Field::required("number", FieldKind::positive()),
            ],
        )
    })
}

/// Field rules for the scheduler's conflict report.
pub fn conflict_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "ReservationConflict",
            vec![
                Field::required("reservationId", FieldKind::positive()),
                Field::required("time", FieldKind::DateTime),
                Field::required("tables", FieldKind::ObjectList(conflict_table_schema)),
            ],
        )
    })
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    pub guests_count: i32,
    pub time: DateTime<Utc>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub status: ReservationStatus,
    pub allergies: Vec<Allergy>,
    /// Assigned table ids, empty until seating is planned.
    pub tables: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        schema().parse(input)
    }
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreate {
    pub guests_count: i32,
    pub time: DateTime<Utc>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub status: ReservationStatus,
    pub allergies: Vec<Allergy>,
    pub tables: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub is_active: bool,
}

impl ReservationCreate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        create_schema().parse(input)
    }
}

/// Update reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<Allergy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ReservationUpdate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        update_schema().parse(input)
    }
}

/// Guest-editable reservation fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationGuestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<Allergy>>,
}

impl ReservationGuestUpdate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        guest_update_schema().parse(input)
    }
}

/// Search reservations payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: ReservationSortBy,
    pub sort_order: SortOrder,
}

impl ReservationSearch {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        search_schema().parse(input)
    }
}

/// Table involved in a scheduling conflict
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictTable {
    pub id: i64,
    pub number: i32,
}

/// Scheduling conflict report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationConflict {
    pub reservation_id: i64,
    pub time: DateTime<Utc>,
    pub tables: Vec<ConflictTable>,
}

impl ReservationConflict {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        conflict_schema().parse(input)
    }
}
