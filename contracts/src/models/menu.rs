//! Menu Item Models (food and drink)

use std::sync::OnceLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::enums::{
    Allergy, DrinkCategory, DrinkSortBy, FoodCategory, FoodSortBy, FoodType, ServingTemperature,
    SortOrder,
};
use crate::query::search_fragment;
use crate::schema::{require_any_field, Field, FieldKind, ListCase, Schema, ValidationError};

/// Rules shared by every menu item, food or drink.
fn base_fields() -> Vec<Field> {
    vec![
        Field::required("id", FieldKind::positive()),
        Field::required("name", FieldKind::text(1, 100)),
        Field::optional("description", FieldKind::text(0, 500)),
        Field::required("price", FieldKind::money()),
        Field::required("ingredients", FieldKind::TextList(ListCase::Title))
            .with_default(json!([])),
    ]
}

/// Field rules for the stored food item.
pub fn food_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let mut fields = base_fields();
        fields.extend([
            Field::required("category", FieldKind::Enum(&FoodCategory::DEF)),
            Field::required("type", FieldKind::Enum(&FoodType::DEF)),
            Field::required("isVegan", FieldKind::Boolean).with_default(json!(false)),
            Field::required("isVegetarian", FieldKind::Boolean).with_default(json!(false)),
            Field::required("isGlutenFree", FieldKind::Boolean).with_default(json!(false)),
            Field::required("allergies", FieldKind::EnumList(&Allergy::DEF))
                .with_default(json!([])),
            Field::required("spiceLevel", FieldKind::int_range(0, 5)).with_default(json!(0)),
            Field::required("preparationTime", FieldKind::unsigned()),
            Field::optional("calories", FieldKind::unsigned()),
        ]);
        Schema::new("FoodItem", fields)
    })
}

pub fn food_create_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| food_schema().omit(&["id"]).named("FoodItemCreate"))
}

pub fn food_update_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        food_create_schema()
            .partial()
            .named("FoodItemUpdate")
            .refine(require_any_field)
    })
}

pub fn food_search_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "FoodSearch",
            vec![
                Field::optional("name", FieldKind::text(1, 100)),
                Field::optional("category", FieldKind::Enum(&FoodCategory::DEF)),
                Field::optional("type", FieldKind::Enum(&FoodType::DEF)),
                Field::optional("isVegan", FieldKind::Boolean),
                Field::optional("isVegetarian", FieldKind::Boolean),
                Field::optional("isGlutenFree", FieldKind::Boolean),
                Field::optional("maxPrice", FieldKind::money()),
            ],
        )
        .extend(&search_fragment(&FoodSortBy::DEF))
    })
}

/// Field rules for the stored drink item.
pub fn drink_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let mut fields = base_fields();
        fields.extend([
            Field::required("category", FieldKind::Enum(&DrinkCategory::DEF)),
            Field::required("volume", FieldKind::positive()),
            Field::required(
                "alcoholPercentage",
                FieldKind::Float { min: Some(0.0), max: Some(100.0) },
            )
            .with_default(json!(0)),
            Field::required("isCarbonated", FieldKind::Boolean).with_default(json!(false)),
            Field::required("servingTemperature", FieldKind::Enum(&ServingTemperature::DEF)),
        ]);
        Schema::new("DrinkItem", fields)
    })
}

pub fn drink_create_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| drink_schema().omit(&["id"]).named("DrinkItemCreate"))
}

pub fn drink_update_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        drink_create_schema()
            .partial()
            .named("DrinkItemUpdate")
            .refine(require_any_field)
    })
}

pub fn drink_search_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "DrinkSearch",
            vec![
                Field::optional("name", FieldKind::text(1, 100)),
                Field::optional("category", FieldKind::Enum(&DrinkCategory::DEF)),
                Field::optional("isCarbonated", FieldKind::Boolean),
                Field::optional(
                    "maxAlcohol",
                    FieldKind::Float { min: Some(0.0), max: Some(100.0) },
                ),
            ],
        )
        .extend(&search_fragment(&DrinkSortBy::DEF))
    })
}

/// Food item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub ingredients: Vec<String>,
    pub category: FoodCategory,
    #[serde(rename = "type")]
    pub food_type: FoodType,
    pub is_vegan: bool,
    pub is_vegetarian: bool,
    pub is_gluten_free: bool,
    pub allergies: Vec<Allergy>,
    /// 0 (none) to 5 (extreme).
    pub spice_level: i32,
    /// Minutes.
    pub preparation_time: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<i32>,
}

impl FoodItem {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        food_schema().parse(input)
    }
}

/// Create food item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub ingredients: Vec<String>,
    pub category: FoodCategory,
    #[serde(rename = "type")]
    pub food_type: FoodType,
    pub is_vegan: bool,
    pub is_vegetarian: bool,
    pub is_gluten_free: bool,
    pub allergies: Vec<Allergy>,
    pub spice_level: i32,
    pub preparation_time: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<i32>,
}

impl FoodItemCreate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        food_create_schema().parse(input)
    }
}

/// Update food item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FoodCategory>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub food_type: Option<FoodType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegetarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_gluten_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<Allergy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<i32>,
}

impl FoodItemUpdate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        food_update_schema().parse(input)
    }
}

/// Search food items payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FoodCategory>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub food_type: Option<FoodType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegetarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_gluten_free: Option<bool>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: FoodSortBy,
    pub sort_order: SortOrder,
}

impl FoodSearch {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        food_search_schema().parse(input)
    }
}

/// Drink item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub ingredients: Vec<String>,
    pub category: DrinkCategory,
    /// Millilitres.
    pub volume: i32,
    pub alcohol_percentage: f64,
    pub is_carbonated: bool,
    pub serving_temperature: ServingTemperature,
}

impl DrinkItem {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        drink_schema().parse(input)
    }
}

/// Create drink item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkItemCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub ingredients: Vec<String>,
    pub category: DrinkCategory,
    pub volume: i32,
    pub alcohol_percentage: f64,
    pub is_carbonated: bool,
    pub serving_temperature: ServingTemperature,
}

impl DrinkItemCreate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        drink_create_schema().parse(input)
    }
}

/// Update drink item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<DrinkCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alcohol_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_carbonated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_temperature: Option<ServingTemperature>,
}

impl DrinkItemUpdate {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        drink_update_schema().parse(input)
    }
}

/// Search drink items payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<DrinkCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_carbonated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_alcohol: Option<f64>,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: DrinkSortBy,
    pub sort_order: SortOrder,
}

impl DrinkSearch {
    pub fn parse(input: &Value) -> Result<Self, ValidationError> {
        drink_search_schema().parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IssueKind;

    #[test]
    fn test_minimal_food_create_fills_defaults() {
        let food: FoodItemCreate = FoodItemCreate::parse(&json!({
            "name": "Margherita",
            "price": "9.50",
            "category": "main_course",
            "type": "PIZZA",
            "preparationTime": 15,
        }))
        .unwrap();
        assert!(!food.is_vegan);
        assert!(!food.is_vegetarian);
        assert!(!food.is_gluten_free);
        assert!(food.allergies.is_empty());
        assert_eq!(food.spice_level, 0);
        assert!(food.ingredients.is_empty());
        assert_eq!(food.category, FoodCategory::MainCourse);
        assert_eq!(food.food_type, FoodType::Pizza);
    }

    #[test]
    fn test_ingredients_title_case_from_either_shape() {
        let payload = |ingredients: Value| {
            json!({
                "name": "Margherita",
                "price": 9.5,
                "category": "MAIN_COURSE",
                "type": "PIZZA",
                "preparationTime": 15,
                "ingredients": ingredients,
            })
        };
        let from_array = food_create_schema()
            .parse_value(&payload(json!(["tomato", " mozzarella ", "BASIL"])))
            .unwrap();
        let from_string = food_create_schema()
            .parse_value(&payload(json!("tomato,  mozzarella , BASIL")))
            .unwrap();
        assert_eq!(from_array["ingredients"], json!(["Tomato", "Mozzarella", "Basil"]));
        assert_eq!(from_array["ingredients"], from_string["ingredients"]);
    }

    #[test]
    fn test_spice_level_range() {
        let err = food_create_schema()
            .parse_value(&json!({
                "name": "Vindaloo",
                "price": 12,
                "category": "MAIN_COURSE",
                "type": "MEAT",
                "preparationTime": 25,
                "spiceLevel": 7,
            }))
            .unwrap_err();
        assert_eq!(err.issues[0].path, "spiceLevel");
        assert_eq!(err.issues[0].message, "must be at most 5");
    }

    #[test]
    fn test_drink_bounds() {
        let err = drink_create_schema()
            .parse_value(&json!({
                "name": "Mystery Shot",
                "price": 5,
                "category": "SPIRIT",
                "volume": 0,
                "alcoholPercentage": 120,
                "servingTemperature": "COLD",
            }))
            .unwrap_err();
        let paths: Vec<&str> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["volume", "alcoholPercentage"]);
        assert!(err.issues.iter().all(|i| i.kind == IssueKind::Constraint));
    }

    #[test]
    fn test_drink_defaults_and_temperature_case() {
        let drink: DrinkItemCreate = DrinkItemCreate::parse(&json!({
            "name": "Still Water",
            "price": 2,
            "category": "water",
            "volume": 500,
            "servingTemperature": "room_temperature",
        }))
        .unwrap();
        assert_eq!(drink.alcohol_percentage, 0.0);
        assert!(!drink.is_carbonated);
        assert_eq!(drink.serving_temperature, ServingTemperature::RoomTemperature);
    }

    #[test]
    fn test_food_search_accepts_query_string_types() {
        let search = FoodSearch::parse(&json!({
            "isVegan": "true",
            "maxPrice": "20",
            "type": "vegetarian",
        }))
        .unwrap();
        assert_eq!(search.is_vegan, Some(true));
        assert_eq!(search.max_price, Some(Decimal::from(20)));
        assert_eq!(search.food_type, Some(FoodType::Vegetarian));
        assert_eq!(search.page_size, 10);
    }

    #[test]
    fn test_empty_updates_are_rejected() {
        assert!(FoodItemUpdate::parse(&json!({})).is_err());
        assert!(DrinkItemUpdate::parse(&json!({})).is_err());
    }
}
