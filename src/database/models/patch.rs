use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Identified, NewRow, TableRow};
use crate::database::table::Table;
use crate::filter::SqlValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Patch {
    pub id: i64,
    #[serde(default)]
    pub vulnerability_id: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub released: Option<DateTime<Utc>>,
    #[serde(default)]
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Patch {
    const TABLE: Table = Table::Patches;
}

impl Identified for Patch {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct NewPatch {
    pub vulnerability_id: i64,
    pub url: String,
    pub released: Option<DateTime<Utc>>,
}

impl NewRow for NewPatch {
    type Row = Patch;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("vulnerability_id", self.vulnerability_id.into()),
            ("url", SqlValue::text(&self.url)),
            ("released", self.released.into()),
        ]
    }
}
