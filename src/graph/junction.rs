use std::collections::HashMap;

use crate::database::models::VulnerabilityThreat;

/// Both directions of the vulnerability/threat many-to-many relation.
///
/// Ids are kept as they appear in the junction rows; whether the referenced
/// rows exist is decided when they are resolved against the indices.
#[derive(Debug, Default)]
pub struct ThreatLinks {
    threats_by_vulnerability: HashMap<i64, Vec<i64>>,
    vulnerabilities_by_threat: HashMap<i64, Vec<i64>>,
}

impl ThreatLinks {
    pub fn from_rows(rows: &[VulnerabilityThreat]) -> Self {
        let mut links = Self::default();
        for row in rows {
            links
                .threats_by_vulnerability
                .entry(row.vulnerability_id)
                .or_default()
                .push(row.threat_id);
            links
                .vulnerabilities_by_threat
                .entry(row.threat_id)
                .or_default()
                .push(row.vulnerability_id);
        }
        links
    }

    pub fn threats_of(&self, vulnerability_id: i64) -> &[i64] {
        self.threats_by_vulnerability
            .get(&vulnerability_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn vulnerabilities_of(&self, threat_id: i64) -> &[i64] {
        self.vulnerabilities_by_threat
            .get(&threat_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
