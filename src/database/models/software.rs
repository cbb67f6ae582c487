use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Identified, NewRow, TableRow};
use crate::database::table::Table;
use crate::filter::SqlValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Software {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Null once the owning vendor is gone.
    #[serde(default)]
    pub vendor_id: Option<i64>,
    #[serde(default)]
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Software {
    const TABLE: Table = Table::Software;
}

impl Identified for Software {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct NewSoftware {
    pub name: String,
    pub version: Option<String>,
    pub vendor_id: i64,
}

impl NewRow for NewSoftware {
    type Row = Software;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", SqlValue::text(&self.name)),
            ("version", self.version.clone().into()),
            ("vendor_id", self.vendor_id.into()),
        ]
    }
}
