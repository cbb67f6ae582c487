use async_trait::async_trait;
use sqlx::{postgres::PgArguments, postgres::PgRow, FromRow, PgPool};
use tracing::debug;

use super::fetcher::{RowFetcher, RowWriter};
use super::manager::DatabaseError;
use super::models::{NewRow, TableRow};
use super::table::Table;
use crate::filter::{Filter, SqlValue};

/// Row store backed by a Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    log_queries: bool,
}

impl PgStore {
    pub fn new(pool: PgPool, log_queries: bool) -> Self {
        Self { pool, log_queries }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RowFetcher for PgStore {
    async fn fetch<T: TableRow>(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError> {
        let sql = filter.to_sql(T::TABLE.name())?;
        if self.log_queries {
            debug!(query = %sql.query, params = sql.params.len(), "select");
        }
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl RowWriter for PgStore {
    async fn insert<N: NewRow>(&self, row: &N) -> Result<N::Row, DatabaseError> {
        let values = row.values();
        let query = insert_sql(N::Row::TABLE, &values);
        if self.log_queries {
            debug!(query = %query, "insert");
        }
        let mut q = sqlx::query_as::<_, N::Row>(&query);
        for (_, value) in values {
            q = bind_param_query_as(q, value);
        }
        Ok(q.fetch_one(&self.pool).await?)
    }

    async fn delete(&self, table: Table, id: i64) -> Result<bool, DatabaseError> {
        let query = format!("DELETE FROM \"{}\" WHERE \"id\" = $1", table.name());
        if self.log_queries {
            debug!(query = %query, id, "delete");
        }
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// `INSERT INTO "t" ("a", "b") VALUES ($1, $2) RETURNING *`
fn insert_sql(table: Table, values: &[(&'static str, SqlValue)]) -> String {
    let columns: Vec<String> = values.iter().map(|(c, _)| format!("\"{}\"", c)).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
        table.name(),
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: SqlValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlValue::Int(i) => q.bind(i),
        SqlValue::Float(f) => q.bind(f),
        SqlValue::Text(s) => q.bind(s),
        SqlValue::Timestamp(ts) => q.bind(ts),
        SqlValue::Uuid(id) => q.bind(id),
    }
}
