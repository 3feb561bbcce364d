//! Order Model

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::enums::{Allergy, OrderSortBy, OrderStatus, PaymentStatus, SortOrder};
use crate::query::search_fragment;
use crate::schema::{require_any_field, Field, FieldKind, Schema, ValidationError};

/// Field rules for one order line.
pub fn item_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "OrderItem",
            vec![
                Field::required("id", FieldKind::positive()),
                Field::required("menuItemId", FieldKind::positive()),
                Field::required("quantity", FieldKind::positive()),
                Field::required("unitPrice", FieldKind::money()),
                Field::required("discount", FieldKind::money()).with_default(json!(0)),
                Field::required("finalPrice", FieldKind::money()).with_default(json!(0)),
                Field::required("guestNumber", FieldKind::positive()).with_default(json!(1)),
                Field::required("allergies", FieldKind::EnumList(&Allergy::DEF))
                    .with_default(json!([])),
                Field::required("isPrinted", FieldKind::Boolean).with_default(json!(false)),
                Field::required("isFired", FieldKind::Boolean).with_default(json!(false)),
                Field::required("paymentStatus", FieldKind::Enum(&PaymentStatus::DEF))
                    .with_default(json!("PENDING")),
            ],
        )
    })
}

/// Line rules for order creation, without the line identity.
pub fn item_create_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| item_schema().omit(&["id"]).named("OrderItemCreate"))
}

/// Field rules for the stored order record. Status membership is
/// validated here; transition legality is business logic elsewhere.
pub fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "Order",
            vec![
                Field::required("id", FieldKind::positive()),
                Field::required("tableId", FieldKind::positive()),
                Field::required("orderNumber", FieldKind::positive()),
                Field::required("guestsCount", FieldKind::positive()).with_default(json!(1)),
                Field::required("serverId", FieldKind::positive()),
                Field::required("status", FieldKind::Enum(&OrderStatus::DEF))
                    .with_default(json!("AWAITING")),
                Field::required("orderTime", FieldKind::DateTime).default_now(),
                Field::required("updatedAt", FieldKind::DateTime).default_now(),
                Field::optional("completionTime", FieldKind::DateTime)
                    .nullable()
                    .with_default(json!(null)),
                Field::required("totalAmount", FieldKind::money()).with_default(json!(0)),
                Field::optional("comments", FieldKind::text(0, 500)),
                Field::required("items", FieldKind::ObjectList(item_schema))
                    .with_default(json!([])),
            ],
        )
    })
}

/// Create payload rules, with lines checked against the create line
/// contract.
pub fn create_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        schema()
            .omit(&["id", "orderTime", "updatedAt", "completionTime"])
            .with_field(
                Field::required("items", FieldKind::ObjectList(item_create_schema))
                    .with_default(json!([])),
            )
            .named("OrderCreate")
    })
}

/// Update payload rules. Line mutations travel through their own
/// contract, so `items` is not updatable here.
pub fn update_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        create_schema()
            .omit(&["items"])
            .partial()
            .named("OrderUpdate")
            .refine(require_any_field)
    })
}

/// Search payload rules: optional filters plus the shared pagination
/// fragment. `from`/`to` bound the order time.
pub fn search_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "OrderSearch",
            vec![
                Field::optional("tableId", FieldKind::positive()),
                Field::optional("serverId", FieldKind::positive()),
                Field::optional("status", FieldKind::Enum(&OrderStatus::DEF)),
                Field::optional("from", FieldKind::DateTime),
                Field::optional("to", FieldKind::DateTime),
            ],
        )
        .extend(&search_fragment(&OrderSortBy::DEF))
    })
}

/// Order line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    /// Seat the line belongs to, 1-based.
    pub guest_number: i32,
    pub allergies: Vec<Allergy>,
    pub is_printed: bool,
    pub is_fired: bool,
    pub payment_status: PaymentStatus,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub table_id: i64,
    pub order_number: i64,
    pub guests_count: i32,
    pub server_id: i64,
    pub status: OrderStatus,
    pub order_time: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completion_time: Option<DateTime<Utc>>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        schema().parse(input)
    }
}

/// Create order line payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemCreate {
    pub menu_item_id: i64,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub guest_number: i32,
    pub allergies: Vec<Allergy>,
    pub is_printed: bool,
    pub is_fired: bool,
    pub payment_status: PaymentStatus,
}

impl OrderItemCreate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        item_create_schema().parse(input)
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub table_id: i64,
    pub order_number: i64,
    pub guests_count: i32,
    pub server_id: i64,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub items: Vec<OrderItemCreate>,
}

impl OrderCreate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        create_schema().parse(input)
    }
}

/// Update order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl OrderUpdate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        update_schema().parse(input)
    }
}

/// Search orders payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: OrderSortBy,
    pub sort_order: SortOrder,
}

impl OrderSearch {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        search_schema().parse(input)
    }
}
