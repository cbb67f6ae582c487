use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Identified, NewRow, TableRow};
use crate::database::table::Table;
use crate::filter::SqlValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    #[sqlx(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Vendor {
    const TABLE: Table = Table::Vendors;
}

impl Identified for Vendor {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct NewVendor {
    pub name: String,
    pub website: Option<String>,
    pub user_id: Option<Uuid>,
}

impl NewRow for NewVendor {
    type Row = Vendor;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", SqlValue::text(&self.name)),
            ("website", self.website.clone().into()),
            ("user_id", self.user_id.into()),
        ]
    }
}
