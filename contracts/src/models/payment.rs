//! Payment Model

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::enums::{PaymentMethod, PaymentSortBy, PaymentStatus, SortOrder};
use crate::query::search_fragment;
use crate::schema::{require_any_field, Field, FieldKind, Schema, ValidationError};

/// Field rules for the stored payment record. Amounts are validated,
/// never computed; splitting and capture live in business logic.
pub fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "Payment",
            vec![
                Field::required("id", FieldKind::positive()),
                Field::required("orderId", FieldKind::positive()),
                Field::required("amount", FieldKind::money()),
                Field::required("tax", FieldKind::money()).with_default(json!(0)),
                Field::required("tip", FieldKind::money()).with_default(json!(0)),
                Field::required("serviceCharge", FieldKind::money()).with_default(json!(0)),
                Field::required("method", FieldKind::Enum(&PaymentMethod::DEF)),
                Field::required("status", FieldKind::Enum(&PaymentStatus::DEF))
                    .with_default(json!("PENDING")),
                Field::required("createdAt", FieldKind::DateTime).default_now(),
                Field::optional("completedAt", FieldKind::DateTime)
                    .nullable()
                    .with_default(json!(null)),
            ],
        )
    })
}

pub fn create_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        schema()
            .omit(&["id", "createdAt", "completedAt"])
            .named("PaymentCreate")
    })
}

pub fn update_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        create_schema()
            .partial()
            .named("PaymentUpdate")
            .refine(require_any_field)
    })
}

pub fn search_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "PaymentSearch",
            vec![
                Field::optional("orderId", FieldKind::positive()),
                Field::optional("method", FieldKind::Enum(&PaymentMethod::DEF)),
                Field::optional("status", FieldKind::Enum(&PaymentStatus::DEF)),
            ],
        )
        .extend(&search_fragment(&PaymentSortBy::DEF))
    })
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tip: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_charge: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        schema().parse(input)
    }
}

/// Create payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    pub order_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tip: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_charge: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

impl PaymentCreate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        create_schema().parse(input)
    }
}

/// Update payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_charge: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
}

impl PaymentUpdate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        update_schema().parse(input)
    }
}

/// Search payments payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: PaymentSortBy,
    pub sort_order: SortOrder,
}

impl PaymentSearch {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        search_schema().parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IssueKind;

    #[test]
    fn test_create_defaults() {
        let payment: PaymentCreate = PaymentCreate::parse(&json!({
            "orderId": 41,
            "amount": "52.40",
            "method": "credit_card",
        }))
        .unwrap();
        assert_eq!(payment.amount, Decimal::new(5240, 2));
        assert_eq!(payment.tax, Decimal::ZERO);
        assert_eq!(payment.tip, Decimal::ZERO);
        assert_eq!(payment.service_charge, Decimal::ZERO);
        assert_eq!(payment.method, PaymentMethod::CreditCard);
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_negative_amounts_are_rejected_not_clamped() {
        let err = create_schema()
            .parse_value(&json!({
                "orderId": 41,
                "amount": 10,
                "tip": -2,
                "method": "CASH",
            }))
            .unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "tip");
        assert_eq!(err.issues[0].kind, IssueKind::Constraint);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let err = create_schema()
            .parse_value(&json!({
                "orderId": 41,
                "amount": 10,
                "method": "BARTER",
            }))
            .unwrap_err();
        assert_eq!(err.issues[0].path, "method");
        assert_eq!(err.issues[0].kind, IssueKind::UnknownVariant);
    }

    #[test]
    fn test_search_page_size_cap() {
        let err = PaymentSearch::parse(&json!({"pageSize": 101})).unwrap_err();
        assert_eq!(err.schema, "PaymentSearch");
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "pageSize");
        assert_eq!(err.issues[0].message, "must be at most 100");
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let err = PaymentUpdate::parse(&json!({})).unwrap_err();
        assert_eq!(err.issues[0].kind, IssueKind::CrossField);
    }

    #[test]
    fn test_completed_payment_roundtrip() {
        let payment = Payment::parse(&json!({
            "id": 7,
            "orderId": 41,
            "amount": 52.4,
            "tax": 4.2,
            "method": "MOBILE_PAYMENT",
            "status": "completed",
            "createdAt": "2025-03-01T20:05:00Z",
            "completedAt": "2025-03-01T20:06:30Z",
        }))
        .unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.completed_at.is_some());
    }
}
