use tracing::debug;

use super::policy::{ViewKind, ViewPolicy};
use crate::database::models::{
    Patch, Software, TableRow, Threat, ThreatType, Vendor, Vulnerability, VulnerabilityThreat,
};
use crate::database::{DatabaseError, RowFetcher};
use crate::filter::Filter;

/// One snapshot of every table a view may read. Tables a view does not read stay empty.
#[derive(Debug, Clone, Default)]
pub struct RowSets {
    pub vendors: Vec<Vendor>,
    pub software: Vec<Software>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub threat_types: Vec<ThreatType>,
    pub threats: Vec<Threat>,
    pub patches: Vec<Patch>,
    pub vulnerability_threats: Vec<VulnerabilityThreat>,
}

/// Fetch the tables `view` reads, concurrently. The root table comes back in the view's order.
pub async fn load_rows<F: RowFetcher>(fetcher: &F, view: ViewKind) -> Result<RowSets, DatabaseError> {
    let policy = view.policy();

    let (vendors, software, vulnerabilities, threat_types, threats, patches, vulnerability_threats) =
        futures::try_join!(
            fetch_table::<Vendor, F>(fetcher, &policy),
            fetch_table::<Software, F>(fetcher, &policy),
            fetch_table::<Vulnerability, F>(fetcher, &policy),
            fetch_table::<ThreatType, F>(fetcher, &policy),
            fetch_table::<Threat, F>(fetcher, &policy),
            fetch_table::<Patch, F>(fetcher, &policy),
            fetch_table::<VulnerabilityThreat, F>(fetcher, &policy),
        )?;

    debug!(view = view.name(), "loaded row sets");

    Ok(RowSets {
        vendors,
        software,
        vulnerabilities,
        threat_types,
        threats,
        patches,
        vulnerability_threats,
    })
}

/// Fetch only the rows one patch's record touches: its vulnerability chain and linked threats.
pub async fn load_patch_rows<F: RowFetcher>(fetcher: &F, patch: &Patch) -> Result<RowSets, DatabaseError> {
    let mut rows = RowSets {
        patches: vec![patch.clone()],
        ..RowSets::default()
    };
    let Some(vulnerability_id) = patch.vulnerability_id else {
        return Ok(rows);
    };
    let Some(vulnerability) = fetcher.fetch_one::<Vulnerability>(&by_id(vulnerability_id)).await? else {
        return Ok(rows);
    };

    let links_filter = Filter::new().eq("vulnerability_id", vulnerability_id);
    let (software, links) = futures::try_join!(
        fetch_optional::<Software, F>(fetcher, vulnerability.software_id),
        fetcher.fetch::<VulnerabilityThreat>(&links_filter),
    )?;

    let vendor_id = software.as_ref().and_then(|s| s.vendor_id);
    let (vendor, threats) = futures::try_join!(
        fetch_optional::<Vendor, F>(fetcher, vendor_id),
        futures::future::try_join_all(
            links.iter().map(|link| fetch_optional::<Threat, F>(fetcher, Some(link.threat_id)))
        ),
    )?;
    let threats: Vec<Threat> = threats.into_iter().flatten().collect();

    let mut type_ids: Vec<i64> = threats.iter().filter_map(|t| t.threat_type_id).collect();
    type_ids.sort_unstable();
    type_ids.dedup();
    let threat_types = futures::future::try_join_all(
        type_ids.into_iter().map(|id| fetch_optional::<ThreatType, F>(fetcher, Some(id))),
    )
    .await?;

    rows.vulnerabilities.push(vulnerability);
    rows.software.extend(software);
    rows.vendors.extend(vendor);
    rows.vulnerability_threats = links;
    rows.threats = threats;
    rows.threat_types = threat_types.into_iter().flatten().collect();

    debug!(patch_id = patch.id, threats = rows.threats.len(), "loaded patch rows");
    Ok(rows)
}

fn by_id(id: i64) -> Filter {
    Filter::new().eq("id", id)
}

async fn fetch_optional<T: TableRow, F: RowFetcher>(
    fetcher: &F,
    id: Option<i64>,
) -> Result<Option<T>, DatabaseError> {
    match id {
        Some(id) => fetcher.fetch_one::<T>(&by_id(id)).await,
        None => Ok(None),
    }
}

async fn fetch_table<T: TableRow, F: RowFetcher>(
    fetcher: &F,
    policy: &ViewPolicy,
) -> Result<Vec<T>, DatabaseError> {
    if !policy.reads(T::TABLE) {
        return Ok(Vec::new());
    }
    let filter = match policy.root_order {
        Some(order) if policy.root == T::TABLE => Filter::new().order(order)?,
        _ => Filter::new(),
    };
    fetcher.fetch::<T>(&filter).await
}
