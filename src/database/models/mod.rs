pub mod patch;
pub mod software;
pub mod threat;
pub mod threat_type;
pub mod user;
pub mod vendor;
pub mod vulnerability;
pub mod vulnerability_threat;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};

use super::table::Table;
use crate::filter::SqlValue;

pub use patch::{NewPatch, Patch};
pub use software::{NewSoftware, Software};
pub use threat::{NewThreat, Threat};
pub use threat_type::{NewThreatType, ThreatType};
pub use user::{NewUser, User};
pub use vendor::{NewVendor, Vendor};
pub use vulnerability::{NewVulnerability, Severity, Vulnerability};
pub use vulnerability_threat::VulnerabilityThreat;

/// A typed row of one table, decodable from Postgres and from the JSON fixture form.
pub trait TableRow:
    for<'r> FromRow<'r, PgRow> + Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static
{
    const TABLE: Table;
}

/// Rows with an integer primary key.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Insert payload for a table: the column values to write, in column order.
pub trait NewRow: Send + Sync {
    type Row: TableRow;

    fn values(&self) -> Vec<(&'static str, SqlValue)>;
}
