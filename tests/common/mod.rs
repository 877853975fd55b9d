//! Common test utilities and an in-memory scan service

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use vulnscan_dashboard::core::client::{RemoteError, ScanApi, validate_new_scan};
use vulnscan_dashboard::core::models::{
    CreatedScan, Finding, NewScanRequest, Scan, ScanDetail, ScanStatus, Severity, StatsSnapshot,
    Timestamp,
};

/// Mock scan service for testing
#[derive(Default)]
pub struct MockScanApi {
    /// Snapshot returned from fetch_stats()
    pub stats: StatsSnapshot,
    /// List returned from fetch_scans()
    pub scans: Vec<Scan>,
    /// Details by scan id; a missing id answers 404
    pub details: HashMap<u64, ScanDetail>,
    /// Ids whose detail fetch fails with a transport-like error
    pub broken: HashSet<u64>,
    /// Captured create requests for verification
    pub created: Arc<Mutex<Vec<NewScanRequest>>>,
    /// Captured delete ids for verification
    pub deleted: Arc<Mutex<Vec<u64>>>,
    pub stats_calls: AtomicUsize,
}

impl MockScanApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(mut self, stats: StatsSnapshot) -> Self {
        self.stats = stats;
        self
    }

    /// Adds a scan to the list and, when given, its findings.
    pub fn with_scan(mut self, scan: Scan, findings: Option<Vec<Finding>>) -> Self {
        if let Some(findings) = findings {
            self.details.insert(scan.id, ScanDetail { scan: scan.clone(), findings });
        }
        self.scans.push(scan);
        self
    }

    pub fn with_broken_detail(mut self, id: u64) -> Self {
        self.broken.insert(id);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl ScanApi for MockScanApi {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, RemoteError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.stats.clone())
    }

    async fn fetch_scans(&self) -> Result<Vec<Scan>, RemoteError> {
        Ok(self.scans.clone())
    }

    async fn fetch_scan_detail(&self, id: u64) -> Result<ScanDetail, RemoteError> {
        if self.broken.contains(&id) {
            return Err(RemoteError::Validation(format!("detail {id} unavailable")));
        }
        self.details.get(&id).cloned().ok_or(RemoteError::ServerRejection {
            status: 404,
            message: "Scan not found".into(),
        })
    }

    async fn create_scan(&self, request: &NewScanRequest) -> Result<CreatedScan, RemoteError> {
        validate_new_scan(request)?;
        let mut created = self.created.lock().await;
        created.push(request.clone());
        Ok(CreatedScan { scan_id: 100 + created.len() as u64, status: ScanStatus::Running })
    }

    async fn delete_scan(&self, id: u64) -> Result<(), RemoteError> {
        self.deleted.lock().await.push(id);
        Ok(())
    }
}

pub fn scan(id: u64, status: ScanStatus, end_secs: Option<i64>) -> Scan {
    let mut scan: Scan = serde_json::from_value(serde_json::json!({
        "id": id,
        "url": format!("https://target{id}.test"),
        "profile": "full",
        "status": status,
        "start_time": "2025-03-01T10:00:00",
    }))
    .expect("valid scan fixture");
    scan.end_time = end_secs.and_then(Timestamp::from_epoch_secs);
    scan
}

pub fn finding(title: &str, severity: Severity) -> Finding {
    Finding {
        title: title.to_string(),
        detail: format!("{title} detail"),
        severity,
        module: "headers".to_string(),
    }
}
