//! Dining Table Model

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::enums::{SortOrder, TableCondition, TableSortBy};
use crate::query::search_fragment;
use crate::schema::{require_any_field, Field, FieldKind, Schema, ValidationError};

/// Field rules for the stored table record.
pub fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "Table",
            vec![
                Field::required("id", FieldKind::positive()),
                Field::required("number", FieldKind::positive()),
                Field::required("capacity", FieldKind::unsigned()),
                Field::required("extraCapacity", FieldKind::unsigned()).with_default(json!(0)),
                // Carried only while a temporary capacity change is in
                // effect, hence no default.
                Field::optional("originalCapacity", FieldKind::unsigned()),
                Field::required("isOccupied", FieldKind::Boolean).with_default(json!(false)),
                Field::required("condition", FieldKind::Enum(&TableCondition::DEF))
                    .with_default(json!("AVAILABLE")),
                Field::required("currentGuests", FieldKind::unsigned()).with_default(json!(0)),
            ],
        )
    })
}

pub fn create_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| schema().omit(&["id"]).named("TableCreate"))
}

pub fn update_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        create_schema()
            .partial()
            .named("TableUpdate")
            .refine(require_any_field)
    })
}

pub fn search_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "TableSearch",
            vec![
                Field::optional("number", FieldKind::positive()),
                Field::optional("isOccupied", FieldKind::Boolean),
                Field::optional("condition", FieldKind::Enum(&TableCondition::DEF)),
                Field::optional("minCapacity", FieldKind::unsigned()),
            ],
        )
        .extend(&search_fragment(&TableSortBy::DEF))
    })
}

/// Field rules for a server-to-tables assignment.
pub fn assignment_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "TableAssignment",
            vec![
                Field::required("serverId", FieldKind::positive()),
                Field::required("assignedTables", FieldKind::IdList).with_default(json!([])),
                Field::required("isPrimary", FieldKind::Boolean).with_default(json!(true)),
            ],
        )
    })
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: i64,
    pub number: i32,
    pub capacity: i32,
    pub extra_capacity: i32,
    /// Capacity before a temporary change, present only while one is
    /// in effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_capacity: Option<i32>,
    pub is_occupied: bool,
    pub condition: TableCondition,
    pub current_guests: i32,
}

impl Table {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        schema().parse(input)
    }
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCreate {
    pub number: i32,
    pub capacity: i32,
    pub extra_capacity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_capacity: Option<i32>,
    pub is_occupied: bool,
    pub condition: TableCondition,
    pub current_guests: i32,
}

impl TableCreate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        create_schema().parse(input)
    }
}

/// Update table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_occupied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<TableCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_guests: Option<i32>,
}

impl TableUpdate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        update_schema().parse(input)
    }
}

/// Search tables payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_occupied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<TableCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_capacity: Option<i32>,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: TableSortBy,
    pub sort_order: SortOrder,
}

impl TableSearch {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        search_schema().parse(input)
    }
}

/// Server-to-tables assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAssignment {
    pub server_id: i64,
    pub assigned_tables: Vec<i64>,
    pub is_primary: bool,
}

impl TableAssignment {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        assignment_schema().parse(input)
    }
}
