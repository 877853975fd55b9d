// src/core/aggregator.rs

//! Collects the findings of every completed scan into one annotated list.

use crate::core::client::ScanApi;
use crate::core::models::{AnnotatedFinding, Scan};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// The merged findings of all completed scans plus the "recent" projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindingSet {
    /// Every finding of every completed scan whose detail could be fetched,
    /// in input scan order.
    pub all: Vec<AnnotatedFinding>,
    /// The completed scan with the greatest `end_time`, if any.
    pub recent_scan: Option<Scan>,
    /// Scans whose detail fetch failed; their findings are missing from `all`.
    pub failed_scans: Vec<u64>,
}

impl FindingSet {
    /// Findings of the most recently finished scan.
    pub fn recent(&self) -> impl Iterator<Item = &AnnotatedFinding> {
        let recent_id = self.recent_scan.as_ref().map(|s| s.id);
        self.all
            .iter()
            .filter(move |f| Some(f.scan_id) == recent_id)
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Picks the completed scan with the latest `end_time`.
///
/// Ties go to the scan encountered first in `scans`. Completed scans without
/// an `end_time` are never picked.
pub fn latest_completed(scans: &[Scan]) -> Option<&Scan> {
    let mut latest: Option<&Scan> = None;
    for scan in scans.iter().filter(|s| s.is_completed()) {
        let Some(end) = scan.end_time else { continue };
        match latest.and_then(|l| l.end_time) {
            Some(best) if end <= best => {}
            _ => latest = Some(scan),
        }
    }
    latest
}

/// Fetches the detail of every completed scan concurrently and merges the
/// findings.
///
/// A failed detail fetch is logged and that scan is skipped; the aggregate is
/// never failed as a whole.
pub async fn aggregate(api: Arc<dyn ScanApi>, scans: &[Scan]) -> FindingSet {
    let completed: Vec<&Scan> = scans.iter().filter(|s| s.is_completed()).collect();
    debug!(completed = completed.len(), "Aggregating findings.");

    let mut tasks = JoinSet::new();
    for (index, scan) in completed.iter().enumerate() {
        let api = Arc::clone(&api);
        let id = scan.id;
        tasks.spawn(async move { (index, api.fetch_scan_detail(id).await) });
    }

    let mut per_scan: Vec<Option<Vec<AnnotatedFinding>>> = vec![None; completed.len()];
    let mut failed_scans = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "Detail fetch task aborted.");
                continue;
            }
        };
        let scan = completed[index];
        match result {
            Ok(detail) => {
                per_scan[index] = Some(
                    detail
                        .findings
                        .into_iter()
                        .map(|f| AnnotatedFinding::new(f, scan))
                        .collect(),
                );
            }
            Err(e) => {
                warn!(scan_id = scan.id, error = %e, "Failed to load scan detail; omitting its findings.");
                failed_scans.push(scan.id);
            }
        }
    }

    // Tasks that died without reporting count as failed too.
    for (index, slot) in per_scan.iter().enumerate() {
        let id = completed[index].id;
        if slot.is_none() && !failed_scans.contains(&id) {
            failed_scans.push(id);
        }
    }
    failed_scans.sort_unstable();

    let all: Vec<AnnotatedFinding> = per_scan.into_iter().flatten().flatten().collect();
    let recent_scan = latest_completed(scans).cloned();

    info!(
        findings = all.len(),
        failed = failed_scans.len(),
        recent = ?recent_scan.as_ref().map(|s| s.id),
        "Findings aggregated."
    );

    FindingSet { all, recent_scan, failed_scans }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ScanStatus, Timestamp};

    fn scan(id: u64, status: ScanStatus, end: Option<i64>) -> Scan {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "url": format!("https://t{id}.test"),
            "status": status,
        }))
        .map(|mut s: Scan| {
            s.end_time = end.and_then(Timestamp::from_epoch_secs);
            s
        })
        .unwrap()
    }

    #[test]
    fn latest_completed_picks_max_end_time() {
        let scans = vec![
            scan(1, ScanStatus::Completed, Some(100)),
            scan(2, ScanStatus::Completed, Some(200)),
            scan(3, ScanStatus::Running, None),
        ];
        assert_eq!(latest_completed(&scans).map(|s| s.id), Some(2));
    }

    #[test]
    fn latest_completed_tie_goes_to_first_encountered() {
        let scans = vec![
            scan(7, ScanStatus::Completed, Some(300)),
            scan(8, ScanStatus::Completed, Some(300)),
        ];
        assert_eq!(latest_completed(&scans).map(|s| s.id), Some(7));
    }

    #[test]
    fn latest_completed_ignores_unfinished_and_undated() {
        let scans = vec![
            scan(1, ScanStatus::Error, Some(900)),
            scan(2, ScanStatus::Completed, None),
        ];
        assert!(latest_completed(&scans).is_none());
    }
}
