use std::collections::HashMap;

use serde_json::{json, Value};

use crate::database::models::TableRow;
use crate::database::{RowFetcher, RowWriter, Store, Table};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult};

/// Collects per-field validation failures for one request body.
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Trimmed text; records an error and yields an empty string when missing or blank.
    pub fn required_text(&mut self, field: &str, value: Option<String>) -> String {
        match optional_text(value) {
            Some(text) => text,
            None => {
                self.add(field, "This field is required");
                String::new()
            }
        }
    }

    /// Records an error and yields 0 when missing.
    pub fn required_id(&mut self, field: &str, value: Option<i64>) -> i64 {
        match value {
            Some(id) => id,
            None => {
                self.add(field, "This field is required");
                0
            }
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Missing or invalid fields", Some(self.0)))
        }
    }
}

/// Trimmed, with blank treated as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// 400 naming `field` when no `T` row has this id.
pub async fn ensure_exists<T: TableRow>(store: &Store, field: &str, id: i64) -> Result<(), ApiError> {
    let found = store.fetch_one::<T>(&Filter::new().eq("id", id)).await?;
    if found.is_none() {
        let mut errors = FieldErrors::new();
        errors.add(field, format!("No {} record with id {}", T::TABLE, id));
        return errors.into_result();
    }
    Ok(())
}

/// 404 when absent, 409 (from the store) when other rows still reference it.
pub async fn delete_by_id(store: &Store, table: Table, id: i64) -> ApiResult<Value> {
    if !store.delete(table, id).await? {
        return Err(ApiError::not_found(format!("No {} record with id {}", table, id)));
    }
    tracing::info!(table = %table, id, "deleted record");
    Ok(ApiResponse::success(json!({
        "id": id,
        "message": format!("Deleted {} record {}", table, id),
    })))
}
