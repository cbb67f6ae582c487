use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    FromRow, Postgres,
};
use thiserror::Error;

use super::{Identified, NewRow, TableRow};
use crate::database::table::Table;
use crate::filter::SqlValue;

/// Serialized in PascalCase; read case-insensitively from JSON and Postgres alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Error)]
#[error("Invalid severity '{0}': expected one of Critical, High, Medium, Low")]
pub struct ParseSeverityError(pub String);

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = ParseSeverityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored as text; decoded case-insensitively.
impl sqlx::Type<Postgres> for Severity {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, Postgres> for Severity {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as sqlx::Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vulnerability {
    pub id: i64,
    #[serde(default)]
    pub software_id: Option<i64>,
    pub cve_id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub cvss_score: Option<f64>,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    #[serde(default)]
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Vulnerability {
    const TABLE: Table = Table::Vulnerabilities;
}

impl Identified for Vulnerability {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct NewVulnerability {
    pub software_id: i64,
    pub cve_id: String,
    pub summary: Option<String>,
    pub severity: Option<Severity>,
    pub cvss_score: Option<f64>,
    pub published: DateTime<Utc>,
}

impl NewRow for NewVulnerability {
    type Row = Vulnerability;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("software_id", self.software_id.into()),
            ("cve_id", SqlValue::text(&self.cve_id)),
            ("summary", self.summary.clone().into()),
            ("severity", SqlValue::Text(self.severity.map(|s| s.as_str().to_string()))),
            ("cvss_score", self.cvss_score.into()),
            ("published", Some(self.published).into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!(" HIGH ".parse::<Severity>().unwrap(), Severity::High);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_serializes_pascal_case() {
        assert_eq!(serde_json::to_value(Severity::Medium).unwrap(), "Medium");
        let parsed: Severity = serde_json::from_value(serde_json::json!("Low")).unwrap();
        assert_eq!(parsed, Severity::Low);
    }

    #[test]
    fn severity_deserializes_case_insensitively() {
        let parsed: Severity = serde_json::from_value(serde_json::json!("high")).unwrap();
        assert_eq!(parsed, Severity::High);
        assert!(serde_json::from_value::<Severity>(serde_json::json!("urgent")).is_err());
    }

    #[test]
    fn new_vulnerability_writes_severity_as_text() {
        let new = NewVulnerability {
            software_id: 10,
            cve_id: "CVE-2024-0001".to_string(),
            summary: None,
            severity: Some(Severity::High),
            cvss_score: Some(7.5),
            published: Utc::now(),
        };
        let values = new.values();
        let severity = values.iter().find(|(c, _)| *c == "severity").unwrap();
        assert_eq!(severity.1, SqlValue::text("High"));
    }
}
