use async_trait::async_trait;

use super::fetcher::{RowFetcher, RowWriter};
use super::manager::DatabaseError;
use super::memory::MemoryStore;
use super::models::{NewRow, TableRow};
use super::postgres::PgStore;
use super::table::Table;
use crate::filter::Filter;

/// The store the server was started with.
pub enum Store {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl Store {
    pub fn kind(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match self {
            Store::Postgres(store) => store.health_check().await,
            Store::Memory(_) => Ok(()),
        }
    }

    pub async fn close(&self) {
        if let Store::Postgres(store) = self {
            store.close().await;
        }
    }
}

#[async_trait]
impl RowFetcher for Store {
    async fn fetch<T: TableRow>(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError> {
        match self {
            Store::Postgres(store) => store.fetch(filter).await,
            Store::Memory(store) => store.fetch(filter).await,
        }
    }
}

#[async_trait]
impl RowWriter for Store {
    async fn insert<N: NewRow>(&self, row: &N) -> Result<N::Row, DatabaseError> {
        match self {
            Store::Postgres(store) => store.insert(row).await,
            Store::Memory(store) => store.insert(row).await,
        }
    }

    async fn delete(&self, table: Table, id: i64) -> Result<bool, DatabaseError> {
        match self {
            Store::Postgres(store) => store.delete(table, id).await,
            Store::Memory(store) => store.delete(table, id).await,
        }
    }
}
