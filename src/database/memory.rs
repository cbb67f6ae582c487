//! In-memory row store backed by JSON rows.
//!
//! Used by tests and by the server's `--fixtures` mode. Enforces the same
//! constraints the Postgres schema does for the routes that write: unique keys
//! and restrict-on-delete for referenced parents.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::fetcher::{RowFetcher, RowWriter};
use super::manager::DatabaseError;
use super::models::{NewRow, TableRow};
use super::table::Table;
use crate::filter::Filter;

type JsonRow = Map<String, Value>;

#[derive(Default)]
struct MemoryTables {
    rows: HashMap<Table, Vec<JsonRow>>,
    next_id: HashMap<Table, i64>,
}

impl MemoryTables {
    fn rows(&self, table: Table) -> &[JsonRow] {
        self.rows.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn allocate_id(&mut self, table: Table) -> i64 {
        let next = self.next_id.entry(table).or_insert(1);
        let id = *next;
        *next += 1;
        id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<MemoryTables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture document: an object keyed by table name, each an array of row objects.
    pub fn from_json(document: Value) -> Result<Self, DatabaseError> {
        let Value::Object(mut document) = document else {
            return Err(DatabaseError::Fixture("fixture document must be an object".to_string()));
        };

        let mut tables = MemoryTables::default();
        for table in Table::ALL {
            let rows = match document.remove(table.name()) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(row) => Ok(row),
                        other => Err(DatabaseError::Fixture(format!(
                            "{}: expected row object, got {}",
                            table, other
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                Some(_) => {
                    return Err(DatabaseError::Fixture(format!("{}: expected an array of rows", table)));
                }
            };

            let max_id = rows.iter().filter_map(|r| r.get("id").and_then(Value::as_i64)).max().unwrap_or(0);
            tables.next_id.insert(table, max_id + 1);
            tables.rows.insert(table, rows);
        }

        if let Some(unknown) = document.keys().next() {
            return Err(DatabaseError::Fixture(format!("unknown table '{}'", unknown)));
        }

        Ok(Self { tables: RwLock::new(tables) })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DatabaseError::Fixture(format!("{}: {}", path.display(), e)))?;
        let document: Value = serde_json::from_str(&text)
            .map_err(|e| DatabaseError::Fixture(format!("{}: {}", path.display(), e)))?;
        Self::from_json(document)
    }

    fn decode<T: TableRow>(row: JsonRow) -> Result<T, DatabaseError> {
        serde_json::from_value(Value::Object(row))
            .map_err(|e| DatabaseError::Fixture(format!("{}: {}", T::TABLE, e)))
    }
}

#[async_trait]
impl RowFetcher for MemoryStore {
    async fn fetch<T: TableRow>(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError> {
        let tables = self.tables.read().await;
        filter
            .apply(tables.rows(T::TABLE))
            .into_iter()
            .map(Self::decode::<T>)
            .collect()
    }
}

#[async_trait]
impl RowWriter for MemoryStore {
    async fn insert<N: NewRow>(&self, row: &N) -> Result<N::Row, DatabaseError> {
        let table = N::Row::TABLE;
        let mut json: JsonRow = row
            .values()
            .into_iter()
            .map(|(column, value)| (column.to_string(), value.to_json()))
            .collect();

        let mut tables = self.tables.write().await;

        let key = table.unique_key();
        if !key.is_empty() {
            let duplicate = tables
                .rows(table)
                .iter()
                .any(|existing| key.iter().all(|c| existing.get(*c) == json.get(*c)));
            if duplicate {
                return Err(DatabaseError::UniqueViolation(format!(
                    "{} already has a row with the same ({})",
                    table,
                    key.join(", ")
                )));
            }
        }

        if table.has_serial_id() && !json.contains_key("id") {
            let id = tables.allocate_id(table);
            json.insert("id".to_string(), Value::from(id));
        }
        json.entry("created_at")
            .or_insert_with(|| serde_json::to_value(Utc::now()).unwrap_or(Value::Null));

        let stored = Self::decode::<N::Row>(json.clone())?;
        tables.rows.entry(table).or_default().push(json);
        Ok(stored)
    }

    async fn delete(&self, table: Table, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;

        let id_value = Value::from(id);
        let Some(position) = tables.rows(table).iter().position(|r| r.get("id") == Some(&id_value)) else {
            return Ok(false);
        };

        for (child, column) in table.dependents() {
            if tables.rows(*child).iter().any(|r| r.get(*column) == Some(&id_value)) {
                return Err(DatabaseError::ForeignKeyViolation(format!(
                    "{} {} is still referenced from {}.{}",
                    table, id, child, column
                )));
            }
        }

        if let Some(rows) = tables.rows.get_mut(&table) {
            rows.remove(position);
        }
        Ok(true)
    }
}
