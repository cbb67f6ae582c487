use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{NewRow, TableRow};
use crate::database::table::Table;
use crate::filter::SqlValue;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for User {
    const TABLE: Table = Table::Users;
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

impl NewRow for NewUser {
    type Row = User;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("email", SqlValue::text(&self.email)),
            ("password_hash", SqlValue::text(&self.password_hash)),
        ]
    }
}
