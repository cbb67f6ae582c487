use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{NewRow, TableRow};
use super::table::Table;
use crate::filter::Filter;

/// Read capability: all rows of one table, narrowed and ordered by the filter.
///
/// Handlers and the graph loaders depend on this trait instead of a concrete
/// client, so the same assembly code runs against Postgres or fixture data.
#[async_trait]
pub trait RowFetcher: Send + Sync {
    async fn fetch<T: TableRow>(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError>;

    async fn fetch_all<T: TableRow>(&self) -> Result<Vec<T>, DatabaseError> {
        self.fetch::<T>(&Filter::new()).await
    }

    async fn fetch_one<T: TableRow>(&self, filter: &Filter) -> Result<Option<T>, DatabaseError> {
        let filter = filter.clone().limit(1)?;
        Ok(self.fetch::<T>(&filter).await?.into_iter().next())
    }
}

/// Write capability used by the create/delete routes.
#[async_trait]
pub trait RowWriter: Send + Sync {
    /// Insert the row and return it as stored (with id and defaults filled in).
    async fn insert<N: NewRow>(&self, row: &N) -> Result<N::Row, DatabaseError>;

    /// Delete by integer id. `Ok(false)` when no row had that id.
    async fn delete(&self, table: Table, id: i64) -> Result<bool, DatabaseError>;
}
