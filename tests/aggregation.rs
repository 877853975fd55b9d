//! Finding aggregation across scans

mod common;

use common::{MockScanApi, finding, scan};
use vulnscan_dashboard::core::aggregator;
use vulnscan_dashboard::core::models::{ScanStatus, Severity};
use vulnscan_dashboard::core::view_model::{SeverityFilter, filter_findings};

#[tokio::test]
async fn test_failed_detail_fetch_keeps_other_findings() {
    let api = MockScanApi::new()
        .with_scan(scan(1, ScanStatus::Completed, Some(100)), Some(vec![finding("a", Severity::High)]))
        .with_scan(scan(2, ScanStatus::Completed, Some(150)), None)
        .with_scan(
            scan(3, ScanStatus::Completed, Some(200)),
            Some(vec![finding("b", Severity::Low), finding("c", Severity::Critical)]),
        )
        .with_broken_detail(2)
        .into_arc();
    let scans = api.scans.clone();

    let set = aggregator::aggregate(api, &scans).await;

    let titles: Vec<&str> = set.all.iter().map(|f| f.finding.title.as_str()).collect();
    assert_eq!(titles, ["a", "b", "c"]);
    assert_eq!(set.failed_scans, [2u64]);
    assert_eq!(set.all[0].scan_id, 1);
    assert_eq!(set.all[1].scan_url, "https://target3.test");
}

#[tokio::test]
async fn test_recent_view_follows_latest_end_time() {
    let api = MockScanApi::new()
        .with_scan(scan(1, ScanStatus::Completed, Some(200)), Some(vec![finding("newest", Severity::Medium)]))
        .with_scan(scan(2, ScanStatus::Completed, Some(100)), Some(vec![finding("older", Severity::Info)]))
        .into_arc();
    let scans = api.scans.clone();

    let set = aggregator::aggregate(api, &scans).await;

    assert_eq!(set.recent_scan.as_ref().map(|s| s.id), Some(1));
    let recent: Vec<&str> = set.recent().map(|f| f.finding.title.as_str()).collect();
    assert_eq!(recent, ["newest"]);
}

#[tokio::test]
async fn test_running_scans_are_not_fetched() {
    let api = MockScanApi::new()
        .with_scan(scan(1, ScanStatus::Running, None), None)
        .with_scan(scan(2, ScanStatus::Error, None), None)
        .into_arc();
    let scans = api.scans.clone();

    let set = aggregator::aggregate(api, &scans).await;

    assert!(set.is_empty());
    assert!(set.failed_scans.is_empty());
    assert!(set.recent_scan.is_none());
}

#[tokio::test]
async fn test_filter_over_aggregated_findings() {
    let api = MockScanApi::new()
        .with_scan(
            scan(1, ScanStatus::Completed, Some(10)),
            Some(vec![
                finding("x", Severity::High),
                finding("y", Severity::Low),
                finding("z", Severity::High),
            ]),
        )
        .into_arc();
    let scans = api.scans.clone();
    let set = aggregator::aggregate(api, &scans).await;

    let high = filter_findings(&set.all, SeverityFilter::Only(Severity::High));
    assert_eq!(high.len(), 2);
    assert_eq!(filter_findings(&set.all, SeverityFilter::All).len(), 3);
    assert!(filter_findings(&set.all, SeverityFilter::Only(Severity::Critical)).is_empty());
}
