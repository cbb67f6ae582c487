use std::collections::HashMap;

use tracing::debug;

use super::index::{group_by, index_by_id};
use super::junction::ThreatLinks;
use super::policy::ViewKind;
use super::rows::RowSets;
use super::views::{
    AssembledView, PatchListItem, PatchVulnerability, SoftwareListItem, SoftwareRef, ThreatListItem,
    ThreatRef, ThreatVulnerability, VendorRef, VulnerabilityListItem,
};
use crate::database::models::{Patch, Software, Threat, ThreatType, Vendor, Vulnerability};

/// Joins one [`RowSets`] snapshot into nested view records.
///
/// Indices are built once per snapshot. Resolution never fails: a missing
/// singular reference becomes `None` and a missing plural member is dropped.
/// Output order always follows the order of the root rows.
pub struct GraphAssembler<'a> {
    rows: &'a RowSets,
    vendors: HashMap<i64, &'a Vendor>,
    software: HashMap<i64, &'a Software>,
    vulnerabilities: HashMap<i64, &'a Vulnerability>,
    threat_types: HashMap<i64, &'a ThreatType>,
    threats: HashMap<i64, &'a Threat>,
    vulnerabilities_by_software: HashMap<i64, Vec<&'a Vulnerability>>,
    patches_by_vulnerability: HashMap<i64, Vec<&'a Patch>>,
    links: ThreatLinks,
}

impl<'a> GraphAssembler<'a> {
    pub fn new(rows: &'a RowSets) -> Self {
        Self {
            rows,
            vendors: index_by_id(&rows.vendors),
            software: index_by_id(&rows.software),
            vulnerabilities: index_by_id(&rows.vulnerabilities),
            threat_types: index_by_id(&rows.threat_types),
            threats: index_by_id(&rows.threats),
            vulnerabilities_by_software: group_by(&rows.vulnerabilities, |v| v.software_id),
            patches_by_vulnerability: group_by(&rows.patches, |p| p.vulnerability_id),
            links: ThreatLinks::from_rows(&rows.vulnerability_threats),
        }
    }

    pub fn assemble(&self, view: ViewKind) -> AssembledView {
        let assembled = match view {
            ViewKind::SoftwareList => AssembledView::Software(self.software_list()),
            ViewKind::VulnerabilityList => AssembledView::Vulnerabilities(self.vulnerability_list()),
            ViewKind::ThreatList => AssembledView::Threats(self.threat_list()),
            ViewKind::PatchList => AssembledView::Patches(self.patch_list()),
        };
        debug!(view = view.name(), records = assembled.len(), "assembled view");
        assembled
    }

    pub fn software_list(&self) -> Vec<SoftwareListItem> {
        self.rows
            .software
            .iter()
            .map(|software| {
                let vendor = self.vendor(software.vendor_id);
                SoftwareListItem {
                    software: software.clone(),
                    vendor_name: vendor.as_ref().map(|v| v.name.clone()),
                    vendor,
                    vulnerability_count: self
                        .vulnerabilities_by_software
                        .get(&software.id)
                        .map_or(0, Vec::len),
                }
            })
            .collect()
    }

    pub fn vulnerability_list(&self) -> Vec<VulnerabilityListItem> {
        self.rows
            .vulnerabilities
            .iter()
            .map(|vulnerability| VulnerabilityListItem {
                vulnerability: vulnerability.clone(),
                software: self.software(vulnerability.software_id),
                patch_count: self
                    .patches_by_vulnerability
                    .get(&vulnerability.id)
                    .map_or(0, Vec::len),
            })
            .collect()
    }

    pub fn threat_list(&self) -> Vec<ThreatListItem> {
        self.rows
            .threats
            .iter()
            .map(|threat| {
                let threat_type = self.threat_type(threat.threat_type_id);
                let vulnerabilities = self
                    .links
                    .vulnerabilities_of(threat.id)
                    .iter()
                    .filter_map(|id| self.vulnerabilities.get(id))
                    .map(|v| ThreatVulnerability {
                        id: v.id,
                        cve_id: v.cve_id.clone(),
                        summary: v.summary.clone(),
                        severity: v.severity,
                        cvss_score: v.cvss_score,
                        software: self.software(v.software_id),
                    })
                    .collect();
                ThreatListItem {
                    threat: threat.clone(),
                    threat_type_name: threat_type.as_ref().map(|t| t.name.clone()),
                    threat_type,
                    vulnerabilities,
                }
            })
            .collect()
    }

    pub fn patch_list(&self) -> Vec<PatchListItem> {
        self.rows.patches.iter().map(|patch| self.patch_item(patch)).collect()
    }

    /// A single patch record, resolved the same way as in the patch list.
    pub fn patch_item(&self, patch: &Patch) -> PatchListItem {
        let vulnerability = patch
            .vulnerability_id
            .and_then(|id| self.vulnerabilities.get(&id))
            .map(|v| PatchVulnerability {
                id: v.id,
                cve_id: v.cve_id.clone(),
                summary: v.summary.clone(),
                severity: v.severity,
                cvss_score: v.cvss_score,
                published: v.published,
                threats: self.threats_of(v.id),
                software: self.software(v.software_id),
            });

        PatchListItem {
            id: patch.id,
            url: patch.url.clone(),
            released: patch.released,
            vulnerability,
        }
    }

    fn vendor(&self, id: Option<i64>) -> Option<VendorRef> {
        id.and_then(|id| self.vendors.get(&id)).map(|v| VendorRef::from(*v))
    }

    fn software(&self, id: Option<i64>) -> Option<SoftwareRef> {
        id.and_then(|id| self.software.get(&id)).map(|s| SoftwareRef {
            id: s.id,
            name: s.name.clone(),
            version: s.version.clone(),
            vendor: self.vendor(s.vendor_id),
        })
    }

    fn threat_type(&self, id: Option<i64>) -> Option<ThreatType> {
        id.and_then(|id| self.threat_types.get(&id)).map(|t| (*t).clone())
    }

    fn threats_of(&self, vulnerability_id: i64) -> Vec<ThreatRef> {
        self.links
            .threats_of(vulnerability_id)
            .iter()
            .filter_map(|id| self.threats.get(id))
            .map(|t| ThreatRef {
                id: t.id,
                name: t.name.clone(),
                description: t.description.clone(),
                threat_type: self.threat_type(t.threat_type_id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Severity, VulnerabilityThreat};
    use std::collections::HashSet;

    fn vendor(id: i64, name: &str, website: Option<&str>) -> Vendor {
        Vendor {
            id,
            name: name.to_string(),
            website: website.map(str::to_string),
            user_id: None,
            created_at: None,
        }
    }

    fn software(id: i64, name: &str, vendor_id: Option<i64>) -> Software {
        Software { id, name: name.to_string(), version: Some("1.0".to_string()), vendor_id, created_at: None }
    }

    fn vulnerability(id: i64, software_id: Option<i64>) -> Vulnerability {
        Vulnerability {
            id,
            software_id,
            cve_id: format!("CVE-2024-{:04}", id),
            summary: None,
            severity: Some(Severity::High),
            cvss_score: Some(7.5),
            published: None,
            created_at: None,
        }
    }

    fn threat(id: i64, threat_type_id: Option<i64>) -> Threat {
        Threat { id, name: format!("threat-{}", id), description: None, threat_type_id, created_at: None }
    }

    fn threat_type(id: i64, name: &str) -> ThreatType {
        ThreatType { id, name: name.to_string(), description: None, created_at: None }
    }

    fn patch(id: i64, vulnerability_id: Option<i64>) -> Patch {
        Patch { id, vulnerability_id, url: format!("https://fix/{}", id), released: None, created_at: None }
    }

    fn link(vulnerability_id: i64, threat_id: i64) -> VulnerabilityThreat {
        VulnerabilityThreat { vulnerability_id, threat_id }
    }

    fn graph() -> RowSets {
        RowSets {
            vendors: vec![vendor(1, "Acme", Some("acme.com")), vendor(2, "Globex", None)],
            software: vec![
                software(10, "Widget", Some(1)),
                software(11, "Gadget", Some(2)),
                software(12, "Orphan", Some(404)),
                software(13, "Unowned", None),
            ],
            vulnerabilities: vec![
                vulnerability(20, Some(10)),
                vulnerability(21, Some(10)),
                vulnerability(22, Some(11)),
                vulnerability(23, Some(999)),
            ],
            threat_types: vec![threat_type(1, "Malware")],
            threats: vec![threat(30, Some(1)), threat(31, Some(77)), threat(32, None)],
            patches: vec![patch(40, Some(20)), patch(41, Some(20)), patch(42, Some(23))],
            vulnerability_threats: vec![
                link(20, 30),
                link(21, 30),
                link(20, 31),
                link(500, 30),
                link(22, 600),
            ],
        }
    }

    #[test]
    fn software_vendor_matches_or_is_null() {
        let rows = graph();
        let items = GraphAssembler::new(&rows).software_list();

        for item in &items {
            let expected = item
                .software
                .vendor_id
                .and_then(|id| rows.vendors.iter().find(|v| v.id == id));
            match expected {
                Some(v) => {
                    let vendor = item.vendor.as_ref().unwrap();
                    assert_eq!(vendor.name, v.name);
                    assert_eq!(vendor.website, v.website);
                    assert_eq!(item.vendor_name.as_deref(), Some(v.name.as_str()));
                }
                None => {
                    assert!(item.vendor.is_none());
                    assert!(item.vendor_name.is_none());
                }
            }
        }
    }

    #[test]
    fn vulnerability_count_matches_group_count() {
        let rows = graph();
        for item in GraphAssembler::new(&rows).software_list() {
            let expected = rows
                .vulnerabilities
                .iter()
                .filter(|v| v.software_id == Some(item.software.id))
                .count();
            assert_eq!(item.vulnerability_count, expected, "software {}", item.software.id);
        }
    }

    #[test]
    fn vulnerability_list_nests_software_and_vendor() {
        let rows = graph();
        let items = GraphAssembler::new(&rows).vulnerability_list();

        let first = &items[0];
        let software = first.software.as_ref().unwrap();
        assert_eq!(software.name, "Widget");
        assert_eq!(software.vendor.as_ref().unwrap().name, "Acme");
        assert_eq!(first.patch_count, 2);

        let dangling = items.iter().find(|i| i.vulnerability.id == 23).unwrap();
        assert!(dangling.software.is_none());
        assert_eq!(dangling.patch_count, 1);
    }

    #[test]
    fn threat_vulnerabilities_match_junction_set() {
        let rows = graph();
        for item in GraphAssembler::new(&rows).threat_list() {
            let nested: HashSet<i64> = item.vulnerabilities.iter().map(|v| v.id).collect();
            let expected: HashSet<i64> = rows
                .vulnerability_threats
                .iter()
                .filter(|l| l.threat_id == item.threat.id)
                .map(|l| l.vulnerability_id)
                .filter(|id| rows.vulnerabilities.iter().any(|v| v.id == *id))
                .collect();
            assert_eq!(nested, expected, "threat {}", item.threat.id);
        }
    }

    #[test]
    fn threat_type_resolves_or_is_null() {
        let rows = graph();
        let items = GraphAssembler::new(&rows).threat_list();
        assert_eq!(items[0].threat_type_name.as_deref(), Some("Malware"));
        assert!(items[1].threat_type.is_none());
        assert!(items[1].threat_type_name.is_none());
        assert!(items[2].vulnerabilities.is_empty());
    }

    #[test]
    fn patch_nests_three_levels_with_threats() {
        let rows = graph();
        let items = GraphAssembler::new(&rows).patch_list();

        let vulnerability = items[0].vulnerability.as_ref().unwrap();
        assert_eq!(vulnerability.id, 20);
        let vendor = vulnerability.software.as_ref().unwrap().vendor.as_ref().unwrap();
        assert_eq!(vendor.name, "Acme");

        let threat_ids: Vec<i64> = vulnerability.threats.iter().map(|t| t.id).collect();
        assert_eq!(threat_ids, vec![30, 31]);
        assert_eq!(vulnerability.threats[0].threat_type.as_ref().unwrap().name, "Malware");
        assert!(vulnerability.threats[1].threat_type.is_none());

        let dangling_software = items[2].vulnerability.as_ref().unwrap();
        assert!(dangling_software.software.is_none());
    }

    #[test]
    fn missing_vulnerability_yields_null_and_keeps_other_patches() {
        let mut rows = graph();
        rows.patches.insert(1, patch(100, Some(999)));
        let items = GraphAssembler::new(&rows).patch_list();

        assert_eq!(items.len(), 4);
        let missing = items.iter().find(|p| p.id == 100).unwrap();
        assert!(missing.vulnerability.is_none());
        assert!(items.iter().filter(|p| p.id != 100).all(|p| p.vulnerability.is_some()));

        let json = serde_json::to_value(missing).unwrap();
        assert_eq!(json["id"], 100);
        assert!(json["vulnerability"].is_null());
    }

    #[test]
    fn acme_widget_round_trip() {
        let rows = RowSets {
            vendors: vec![vendor(1, "Acme", Some("acme.com"))],
            software: vec![software(10, "Widget", Some(1))],
            vulnerabilities: vec![vulnerability(1, Some(10)), vulnerability(2, Some(10))],
            ..RowSets::default()
        };
        let items = GraphAssembler::new(&rows).software_list();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].software.id, 10);
        assert_eq!(items[0].vendor.as_ref().unwrap().name, "Acme");
        assert_eq!(items[0].vulnerability_count, 2);

        let json = serde_json::to_value(&items[0]).unwrap();
        assert_eq!(json["name"], "Widget");
        assert_eq!(json["vendor"]["website"], "acme.com");
        assert_eq!(json["vendor_name"], "Acme");
    }

    #[test]
    fn output_follows_root_order() {
        let rows = RowSets {
            software: vec![software(3, "C", None), software(1, "A", None), software(2, "B", None)],
            patches: vec![patch(9, None), patch(4, None), patch(6, None)],
            ..RowSets::default()
        };
        let assembler = GraphAssembler::new(&rows);

        let software: Vec<i64> = assembler.software_list().iter().map(|s| s.software.id).collect();
        assert_eq!(software, vec![3, 1, 2]);
        let patches: Vec<i64> = assembler.patch_list().iter().map(|p| p.id).collect();
        assert_eq!(patches, vec![9, 4, 6]);
    }

    #[test]
    fn empty_snapshot_assembles_empty_views() {
        let rows = RowSets::default();
        let assembler = GraphAssembler::new(&rows);
        for view in ViewKind::ALL {
            assert!(assembler.assemble(view).is_empty());
        }
    }
}
