use std::cmp::Ordering;

use chrono::DateTime;
use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::types::{FilterCondition, FilterOrderInfo, SortDirection, SqlResult, SqlValue};

/// Row selection for a single table: equality conditions, ordering and an optional limit.
///
/// The same description is rendered to parameterised SQL for Postgres and
/// evaluated directly against JSON rows by the in-memory store.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<FilterCondition>,
    order: Vec<FilterOrderInfo>,
    limit: Option<i64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.conditions.push(FilterCondition { column: column.into(), value: value.into() });
        self
    }

    /// Append ordering from a string such as `"published desc"`.
    pub fn order(mut self, order_by: &str) -> Result<Self, FilterError> {
        self.order.extend(FilterOrder::parse(order_by)?);
        Ok(self)
    }

    pub fn limit(mut self, limit: i64) -> Result<Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn to_sql(&self, table_name: &str) -> Result<SqlResult, FilterError> {
        Self::validate_table_name(table_name)?;
        self.validate_columns()?;

        let mut params = Vec::new();
        let mut clauses = Vec::new();
        for condition in &self.conditions {
            if condition.value.is_null() {
                clauses.push(format!("\"{}\" IS NULL", condition.column));
            } else {
                params.push(condition.value.clone());
                clauses.push(format!("\"{}\" = ${}", condition.column, params.len()));
            }
        }

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", table_name),
            if clauses.is_empty() { String::new() } else { format!("WHERE {}", clauses.join(" AND ")) },
            FilterOrder::generate(&self.order),
            self.limit.map(|l| format!("LIMIT {}", l)).unwrap_or_default(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    /// Apply conditions, ordering and limit to JSON rows, keeping input order for ties.
    pub fn apply(&self, rows: &[Map<String, Value>]) -> Vec<Map<String, Value>> {
        let mut selected: Vec<Map<String, Value>> = rows
            .iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect();

        if !self.order.is_empty() {
            selected.sort_by(|a, b| {
                for info in &self.order {
                    let left = a.get(&info.column).unwrap_or(&Value::Null);
                    let right = b.get(&info.column).unwrap_or(&Value::Null);
                    let ord = compare_json(left, right, info.sort);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit as usize);
        }
        selected
    }

    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        self.conditions.iter().all(|condition| {
            let actual = row.get(&condition.column).unwrap_or(&Value::Null);
            json_eq(actual, &condition.value.to_json())
        })
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if !is_identifier(name) {
            return Err(FilterError::InvalidTableName(name.to_string()));
        }
        Ok(())
    }

    fn validate_columns(&self) -> Result<(), FilterError> {
        let columns = self
            .conditions
            .iter()
            .map(|c| c.column.as_str())
            .chain(self.order.iter().map(|o| o.column.as_str()));
        for column in columns {
            if !is_identifier(column) {
                return Err(FilterError::InvalidColumn(column.to_string()));
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

/// Postgres ordering: NULLs sort last ascending and first descending.
fn compare_json(left: &Value, right: &Value, sort: SortDirection) -> Ordering {
    let ord = match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => {
            match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    };
    match sort {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}
