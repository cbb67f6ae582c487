use serde::Serialize;

use crate::database::Table;

/// The four nested resource views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    SoftwareList,
    VulnerabilityList,
    ThreatList,
    PatchList,
}

/// What a view iterates over, how its roots are ordered, and which tables it reads.
#[derive(Debug, Clone, Copy)]
pub struct ViewPolicy {
    pub root: Table,
    pub root_order: Option<&'static str>,
    pub reads: &'static [Table],
}

impl ViewPolicy {
    pub fn reads(&self, table: Table) -> bool {
        self.reads.contains(&table)
    }
}

const SOFTWARE_LIST: ViewPolicy = ViewPolicy {
    root: Table::Software,
    root_order: Some("created_at desc"),
    reads: &[Table::Software, Table::Vendors, Table::Vulnerabilities],
};

const VULNERABILITY_LIST: ViewPolicy = ViewPolicy {
    root: Table::Vulnerabilities,
    root_order: Some("published desc"),
    reads: &[Table::Vulnerabilities, Table::Software, Table::Vendors, Table::Patches],
};

const THREAT_LIST: ViewPolicy = ViewPolicy {
    root: Table::Threats,
    root_order: Some("created_at desc"),
    reads: &[
        Table::Threats,
        Table::ThreatTypes,
        Table::VulnerabilityThreats,
        Table::Vulnerabilities,
        Table::Software,
        Table::Vendors,
    ],
};

const PATCH_LIST: ViewPolicy = ViewPolicy {
    root: Table::Patches,
    root_order: Some("released desc"),
    reads: &[
        Table::Patches,
        Table::Vulnerabilities,
        Table::Software,
        Table::Vendors,
        Table::VulnerabilityThreats,
        Table::Threats,
        Table::ThreatTypes,
    ],
};

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::SoftwareList,
        ViewKind::VulnerabilityList,
        ViewKind::ThreatList,
        ViewKind::PatchList,
    ];

    pub fn policy(self) -> ViewPolicy {
        match self {
            ViewKind::SoftwareList => SOFTWARE_LIST,
            ViewKind::VulnerabilityList => VULNERABILITY_LIST,
            ViewKind::ThreatList => THREAT_LIST,
            ViewKind::PatchList => PATCH_LIST,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewKind::SoftwareList => "software-list",
            ViewKind::VulnerabilityList => "vulnerability-list",
            ViewKind::ThreatList => "threat-list",
            ViewKind::PatchList => "patch-list",
        }
    }
}
