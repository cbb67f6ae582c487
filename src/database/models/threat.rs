use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Identified, NewRow, TableRow};
use crate::database::table::Table;
use crate::filter::SqlValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Threat {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub threat_type_id: Option<i64>,
    #[serde(default)]
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Threat {
    const TABLE: Table = Table::Threats;
}

impl Identified for Threat {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct NewThreat {
    pub name: String,
    pub description: Option<String>,
    pub threat_type_id: Option<i64>,
}

impl NewRow for NewThreat {
    type Row = Threat;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", SqlValue::text(&self.name)),
            ("description", self.description.clone().into()),
            ("threat_type_id", self.threat_type_id.into()),
        ]
    }
}
