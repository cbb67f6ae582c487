use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{NewRow, TableRow};
use crate::database::table::Table;
use crate::filter::SqlValue;

/// Junction row linking a vulnerability to a threat. The pair is the whole identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VulnerabilityThreat {
    pub vulnerability_id: i64,
    pub threat_id: i64,
}

impl TableRow for VulnerabilityThreat {
    const TABLE: Table = Table::VulnerabilityThreats;
}

impl NewRow for VulnerabilityThreat {
    type Row = VulnerabilityThreat;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("vulnerability_id", self.vulnerability_id.into()),
            ("threat_id", self.threat_id.into()),
        ]
    }
}
