use serde::{Deserialize, Serialize};

/// Every table the service reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Vendors,
    Software,
    Vulnerabilities,
    ThreatTypes,
    Threats,
    Patches,
    VulnerabilityThreats,
    Users,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Vendors,
        Table::Software,
        Table::Vulnerabilities,
        Table::ThreatTypes,
        Table::Threats,
        Table::Patches,
        Table::VulnerabilityThreats,
        Table::Users,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Vendors => "vendors",
            Table::Software => "software",
            Table::Vulnerabilities => "vulnerabilities",
            Table::ThreatTypes => "threat_types",
            Table::Threats => "threats",
            Table::Patches => "patches",
            Table::VulnerabilityThreats => "vulnerability_threats",
            Table::Users => "users",
        }
    }

    /// Whether the store assigns a serial integer `id` on insert.
    pub fn has_serial_id(self) -> bool {
        !matches!(self, Table::VulnerabilityThreats | Table::Users)
    }

    /// Columns forming the table's unique key beyond the primary id.
    pub fn unique_key(self) -> &'static [&'static str] {
        match self {
            Table::Users => &["email"],
            Table::VulnerabilityThreats => &["vulnerability_id", "threat_id"],
            _ => &[],
        }
    }

    /// Child tables (and their foreign-key column) that block deleting a parent row.
    pub fn dependents(self) -> &'static [(Table, &'static str)] {
        match self {
            Table::Vendors => &[(Table::Software, "vendor_id")],
            Table::Software => &[(Table::Vulnerabilities, "software_id")],
            Table::Vulnerabilities => &[
                (Table::Patches, "vulnerability_id"),
                (Table::VulnerabilityThreats, "vulnerability_id"),
            ],
            Table::ThreatTypes => &[(Table::Threats, "threat_type_id")],
            Table::Threats => &[(Table::VulnerabilityThreats, "threat_id")],
            Table::Patches | Table::VulnerabilityThreats | Table::Users => &[],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
