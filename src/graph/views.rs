//! Serialized shapes of the nested views.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{Severity, Software, Threat, ThreatType, Vendor, Vulnerability};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRef {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
}

impl From<&Vendor> for VendorRef {
    fn from(vendor: &Vendor) -> Self {
        Self {
            id: vendor.id,
            name: vendor.name.clone(),
            website: vendor.website.clone(),
        }
    }
}

/// Software with its vendor resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoftwareRef {
    pub id: i64,
    pub name: String,
    pub version: Option<String>,
    pub vendor: Option<VendorRef>,
}

/// Threat with its type resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatRef {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub threat_type: Option<ThreatType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoftwareListItem {
    #[serde(flatten)]
    pub software: Software,
    pub vendor: Option<VendorRef>,
    pub vendor_name: Option<String>,
    pub vulnerability_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VulnerabilityListItem {
    #[serde(flatten)]
    pub vulnerability: Vulnerability,
    pub software: Option<SoftwareRef>,
    pub patch_count: usize,
}

/// A vulnerability as nested under a threat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatVulnerability {
    pub id: i64,
    pub cve_id: String,
    pub summary: Option<String>,
    pub severity: Option<Severity>,
    pub cvss_score: Option<f64>,
    pub software: Option<SoftwareRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatListItem {
    #[serde(flatten)]
    pub threat: Threat,
    pub threat_type: Option<ThreatType>,
    pub threat_type_name: Option<String>,
    pub vulnerabilities: Vec<ThreatVulnerability>,
}

/// A vulnerability as nested under a patch, carrying its threats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchVulnerability {
    pub id: i64,
    pub cve_id: String,
    pub summary: Option<String>,
    pub severity: Option<Severity>,
    pub cvss_score: Option<f64>,
    pub published: Option<DateTime<Utc>>,
    pub threats: Vec<ThreatRef>,
    pub software: Option<SoftwareRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchListItem {
    pub id: i64,
    pub url: String,
    pub released: Option<DateTime<Utc>>,
    pub vulnerability: Option<PatchVulnerability>,
}

/// Output of any view, serialized as a plain array of its records.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AssembledView {
    Software(Vec<SoftwareListItem>),
    Vulnerabilities(Vec<VulnerabilityListItem>),
    Threats(Vec<ThreatListItem>),
    Patches(Vec<PatchListItem>),
}

impl AssembledView {
    pub fn len(&self) -> usize {
        match self {
            AssembledView::Software(items) => items.len(),
            AssembledView::Vulnerabilities(items) => items.len(),
            AssembledView::Threats(items) => items.len(),
            AssembledView::Patches(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
