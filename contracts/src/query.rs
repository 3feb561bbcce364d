//! Shared search and pagination contracts
//!
//! Every entity's search payload extends the same fragment: `page`,
//! `pageSize`, `sortBy`, `sortOrder`, all defaulted so `{}` is a valid
//! query. List endpoints answer with [`PaginatedResponse`].

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::enums::{EnumDef, SortOrder};
use crate::schema::{Field, FieldKind, Schema};

/// Pagination/sort fragment shared by all search schemas.
///
/// `sort_by` names the entity's sortable columns; the default sort is
/// always `id` ascending. `pageSize` is capped at 100.
pub fn search_fragment(sort_by: &'static EnumDef) -> Schema {
    Schema::new(
        "Search",
        vec![
            Field::optional("page", FieldKind::positive()).with_default(json!(1)),
            Field::optional("pageSize", FieldKind::int_range(1, 100)).with_default(json!(10)),
            Field::optional("sortBy", FieldKind::Enum(sort_by)).with_default(json!("id")),
            Field::optional("sortOrder", FieldKind::Enum(&SortOrder::DEF))
                .with_default(json!("asc")),
        ],
    )
}

/// Standard list-endpoint envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    /// Total matching records across all pages.
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        let total_pages = if page_size > 0 {
            ((total as f64) / (page_size as f64)).ceil() as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            page_size,
            total_pages,
        }
    }

    /// Single-page response for unpaginated listings.
    pub fn single_page(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            data,
            total,
            page: 1,
            page_size: total as u32,
            total_pages: 1,
        }
    }
}
