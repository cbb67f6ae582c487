use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Identified, NewRow, TableRow};
use crate::database::table::Table;
use crate::filter::SqlValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ThreatType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for ThreatType {
    const TABLE: Table = Table::ThreatTypes;
}

impl Identified for ThreatType {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct NewThreatType {
    pub name: String,
    pub description: Option<String>,
}

impl NewRow for NewThreatType {
    type Row = ThreatType;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", SqlValue::text(&self.name)),
            ("description", self.description.clone().into()),
        ]
    }
}
